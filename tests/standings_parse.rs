use std::fs;
use std::path::PathBuf;

use lff_scrape::standings::parse_standings;

const STAMP: &str = "2025-07-01T12:00:00+00:00";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_active_table_and_skips_bad_row() {
    let html = read_fixture("standings.html");
    let rows = parse_standings(&html, "a-lyga", STAMP);

    // Three data rows, the last one missing a cell.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].team, "FK Banga");
    assert_eq!(rows[0].logo.as_deref(), Some("/images/logos/banga.png"));
    assert_eq!(rows[0].points, 23);
    assert_eq!(rows[1].team, "Žalgiris");
    assert_eq!(rows[1].logo.as_deref(), Some("/images/logos/zalgiris.png"));

    // The inactive season table must not leak into the snapshot.
    assert!(rows.iter().all(|row| row.team != "Senas Klubas"));
    assert!(rows.iter().all(|row| row.league == "a-lyga"));
}

#[test]
fn standings_invariants_hold_for_valid_rows() {
    let html = read_fixture("standings.html");
    for row in parse_standings(&html, "a-lyga", STAMP) {
        assert_eq!(row.played, row.won + row.drawn + row.lost, "{}", row.team);
        assert_eq!(
            row.goal_difference,
            row.goals_for as i32 - row.goals_against as i32,
            "{}",
            row.team
        );
    }
}

#[test]
fn parsing_is_a_pure_function_of_the_input() {
    let html = read_fixture("standings.html");
    let first = parse_standings(&html, "a-lyga", STAMP);
    let second = parse_standings(&html, "a-lyga", STAMP);
    assert_eq!(first, second);
}

#[test]
fn missing_active_table_yields_empty_list() {
    let html = "<html><body><table><tr><td>1</td></tr></table></body></html>";
    assert!(parse_standings(html, "a-lyga", STAMP).is_empty());
}

#[test]
fn empty_cells_default_to_zero_and_team_name_is_synthesized() {
    let html = r#"
        <html><body><div class="tab-pane active"><table>
          <tr>
            <td>4</td>
            <td>Plain Text Club</td>
            <td></td><td></td><td></td><td></td><td></td><td></td><td>-3</td><td></td>
          </tr>
        </table></div></body></html>
    "#;
    let rows = parse_standings(html, "pirma-lyga", STAMP);
    assert_eq!(rows.len(), 1);
    // No nested name element, so the placeholder kicks in.
    assert!(rows[0].team.starts_with("Team "));
    assert_eq!(rows[0].played, 0);
    assert_eq!(rows[0].points, 0);
    assert_eq!(rows[0].goal_difference, -3);
    assert_eq!(rows[0].last_updated, STAMP);
}

use std::fs;
use std::path::PathBuf;

use lff_scrape::match_detail::{parse_events, parse_statistics};
use lff_scrape::records::{EventKind, StatPair, TeamSide};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn timeline_entries_are_tallied_per_side() {
    let html = read_fixture("match_detail_timeline.html");
    let stats = parse_statistics(&html).expect("timeline yields statistics");

    assert_eq!(stats.goals, Some(StatPair { home: 2, away: 1 }));
    assert_eq!(stats.yellow_cards, Some(StatPair { home: 1, away: 0 }));
    assert_eq!(stats.substitutions, Some(StatPair { home: 0, away: 1 }));
    // No red card entry on the page, so the category is absent, not zeroed.
    assert_eq!(stats.red_cards, None);
    assert_eq!(stats.possession, None);
}

#[test]
fn keyword_fallback_requires_both_sides() {
    let html = read_fixture("match_detail_stats.html");
    let stats = parse_statistics(&html).expect("stats tab yields statistics");

    assert_eq!(stats.possession, Some(StatPair { home: 55, away: 45 }));
    assert_eq!(stats.corners, Some(StatPair { home: 7, away: 3 }));
    // Only one shots-on-target element, and the second fouls cell has no
    // number, so both categories are dropped.
    assert_eq!(stats.shots_on_target, None);
    assert_eq!(stats.fouls, None);
    assert_eq!(stats.goals, None);
}

#[test]
fn no_derivable_data_is_none() {
    let html = "<html><body><p>Rungtynės neįvyko</p></body></html>";
    assert!(parse_statistics(html).is_none());
    assert!(parse_events(html).is_none());
}

#[test]
fn events_are_filtered_deduplicated_and_sorted() {
    let html = read_fixture("match_detail_events.html");
    let events = parse_events(&html).expect("events present");

    let summary: Vec<(u32, &str)> = events
        .iter()
        .map(|e| (e.minute, e.player.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (23, "J. Petrauskas"),
            (55, "A. Jonaitis"),
            (78, "M. Kazlauskas"),
        ]
    );

    for event in &events {
        assert!((1..=120).contains(&event.minute));
        // The text patterns cannot classify events or sides; the defaults are
        // part of the contract.
        assert_eq!(event.kind, EventKind::Other);
        assert_eq!(event.team, TeamSide::Home);
    }
}

use anyhow::{Result, anyhow};
use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::records::StandingRow;

// The page renders one table per season and hides all but the current one;
// only the active pane's table is the live snapshot. Ordered from the most
// specific markup variant to the loosest.
const ACTIVE_TABLE_SELECTORS: &[&str] = &[
    "div.tab-pane.active table.standings-table",
    "div.tab-pane.active table",
    "table.standings-table.active",
    "table.active",
];

const TEAM_NAME_SELECTORS: &[&str] = &[".team-name", ".name", "a"];

static STYLE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"background-image\s*:\s*url\(['"]?([^'")]+)['"]?\)"#).expect("valid regex")
});

/// Extract the league table from a standings page. Structural misses produce
/// an empty list with a warning; a malformed row is skipped without touching
/// its neighbours.
pub fn parse_standings(html: &str, league: &str, stamped_at: &str) -> Vec<StandingRow> {
    let document = Html::parse_document(html);

    let Some(table) = find_active_table(&document) else {
        warn!("no active standings table found for league {league}");
        return Vec::new();
    };

    let row_selector = Selector::parse("tr").expect("valid selector");
    let mut rows = Vec::new();

    for (index, row) in table.select(&row_selector).enumerate() {
        let cells = collect_cells(&row);
        if cells.is_empty() {
            // Header or decorative row.
            continue;
        }
        match parse_standing_row(&cells, index, league, stamped_at) {
            Ok(standing) => rows.push(standing),
            Err(err) => {
                error!("skipping standings row {index} for league {league}: {err:#}");
            }
        }
    }

    rows
}

fn find_active_table<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    for raw in ACTIVE_TABLE_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(table) = document.select(&selector).next() {
            return Some(table);
        }
    }
    None
}

fn parse_standing_row(
    cells: &[ElementRef<'_>],
    index: usize,
    league: &str,
    stamped_at: &str,
) -> Result<StandingRow> {
    if cells.len() < 10 {
        return Err(anyhow!("expected at least 10 cells, got {}", cells.len()));
    }

    let team = team_name(&cells[1]).unwrap_or_else(|| format!("Team {}", index + 1));
    let logo = team_logo(&cells[1]);

    Ok(StandingRow {
        position: cell_number(&cells[0]),
        team,
        logo,
        played: cell_number(&cells[2]),
        won: cell_number(&cells[3]),
        drawn: cell_number(&cells[4]),
        lost: cell_number(&cells[5]),
        goals_for: cell_number(&cells[6]),
        goals_against: cell_number(&cells[7]),
        goal_difference: parse_goal_difference(&cell_text(&cells[8])),
        points: cell_number(&cells[9]),
        league: league.to_string(),
        last_updated: stamped_at.to_string(),
    })
}

fn collect_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
    row.select(&CELLS).collect()
}

fn team_name(cell: &ElementRef<'_>) -> Option<String> {
    for raw in TEAM_NAME_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(el) = cell.select(&selector).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Team crests are not <img> tags on this site; they arrive as a CSS
/// background-image in an inline style attribute.
fn team_logo(cell: &ElementRef<'_>) -> Option<String> {
    static STYLED: Lazy<Selector> =
        Lazy::new(|| Selector::parse("[style]").expect("valid selector"));
    for el in cell.select(&STYLED) {
        let style = el.value().attr("style")?;
        if let Some(caps) = STYLE_URL_RE.captures(style) {
            return Some(caps[1].trim().to_string());
        }
    }
    None
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    element_text(cell)
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First embedded integer in the cell, or 0. Empty and unparsable cells are
/// deliberately tolerated rather than rejected.
fn cell_number(cell: &ElementRef<'_>) -> u32 {
    first_number(&cell_text(cell)).unwrap_or(0)
}

fn first_number(text: &str) -> Option<u32> {
    static NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));
    NUM.find(text)?.as_str().parse().ok()
}

/// Goal difference comes with an explicit sign prefix ("-3", "+3"). Strip the
/// sign, parse the magnitude, reapply the sign from the leading minus.
fn parse_goal_difference(text: &str) -> i32 {
    let trimmed = text.trim();
    let negative = trimmed.starts_with('-');
    let magnitude = first_number(trimmed.trim_start_matches(['-', '+'])).unwrap_or(0) as i32;
    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::{first_number, parse_goal_difference};

    #[test]
    fn goal_difference_sign_handling() {
        assert_eq!(parse_goal_difference("-3"), -3);
        assert_eq!(parse_goal_difference("+3"), 3);
        assert_eq!(parse_goal_difference("7"), 7);
        assert_eq!(parse_goal_difference(""), 0);
        assert_eq!(parse_goal_difference(" - 12 "), -12);
    }

    #[test]
    fn first_number_finds_embedded_digits() {
        assert_eq!(first_number("  42 "), Some(42));
        assert_eq!(first_number("pts: 9"), Some(9));
        assert_eq!(first_number("none"), None);
    }
}

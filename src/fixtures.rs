use std::collections::HashSet;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::records::{FixtureRow, FixtureStatus};

// The fixtures listing has been seen under several markup skins; all variants
// present on a page are processed, not just the first.
const FIXTURE_TABLE_SELECTORS: &[&str] = &[
    "table.fixtures-table",
    "div.fixtures-list table",
    "table.schedule-table",
    "div.tvarkarastis table",
];

const TEAM_NAME_SELECTORS: &[&str] = &[".team-name", ".name", "a", "span"];

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s+(\d{2})\s+(\d{2})").expect("valid regex"));

// Score separators drift between hyphen, colon and a bare space (a newline in
// the cell collapses to a space). Tried strictest first; first match wins.
static SCORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(\d+)\s*-\s*(\d+)$",
        r"^(\d+)\s*[:–]\s*(\d+)$",
        r"^(\d+)\s+(\d+)$",
    ]
    .iter()
    .map(|raw| Regex::new(raw).expect("valid regex"))
    .collect()
});

static ROUND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d+\s*TURAS").expect("valid regex"));

static STYLE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"background-image\s*:\s*url\(['"]?([^'")]+)['"]?\)"#).expect("valid regex")
});

/// Decides a fixture's status from (score, match date, today).
///
/// Kept as a named, swappable rule because the no-score branch is a guess,
/// not a fact read off the page.
pub type StatusRule = fn(Option<(u32, u32)>, Option<NaiveDate>, NaiveDate) -> FixtureStatus;

/// Default rule: a parsed score means completed; otherwise a date strictly in
/// the past is taken as "the match happened but score scraping failed".
/// A postponed or cancelled match with no explicit marker is misclassified as
/// completed by this rule.
pub fn date_passed_means_completed(
    score: Option<(u32, u32)>,
    date: Option<NaiveDate>,
    today: NaiveDate,
) -> FixtureStatus {
    if score.is_some() {
        return FixtureStatus::Completed;
    }
    match date {
        Some(d) if d < today => FixtureStatus::Completed,
        _ => FixtureStatus::Upcoming,
    }
}

/// Inputs the fixtures parser needs beyond the HTML itself. `today` is passed
/// in rather than sampled so the parse stays a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct FixtureContext<'a> {
    pub club: &'a str,
    pub origin: &'a str,
    pub today: NaiveDate,
    pub status_rule: StatusRule,
}

/// Extract the club's fixtures from a listing page. Rows not involving the
/// club are dropped; malformed rows are logged and skipped.
pub fn parse_fixtures(html: &str, league: &str, ctx: &FixtureContext<'_>) -> Vec<FixtureRow> {
    let document = Html::parse_document(html);
    let round = page_round(&document);

    let row_selector = Selector::parse("tr").expect("valid selector");
    let mut fixtures = Vec::new();
    let mut row_index = 0usize;

    for table in fixture_tables(&document) {
        for row in table.select(&row_selector) {
            let cells = collect_cells(&row);
            if cells.is_empty() {
                continue;
            }
            let index = row_index;
            row_index += 1;

            match parse_fixture_row(&row, &cells, index, league, round.as_deref(), ctx) {
                Ok(Some(fixture)) => fixtures.push(fixture),
                Ok(None) => {} // not the club's match
                Err(err) => {
                    error!("skipping fixtures row {index} for league {league}: {err:#}");
                }
            }
        }
    }

    fixtures
}

/// Deterministic upsert key: league, teams, date, time and the row's position
/// on the page, lowercased and stripped to `[a-z0-9_]`. Re-scraping an
/// unchanged page reproduces the same fingerprints in the same order. A row
/// that moves to a different index gets a new fingerprint, so a reordered
/// listing produces a duplicate record rather than an update.
pub fn fingerprint(
    league: &str,
    home: &str,
    away: &str,
    date: &str,
    time: &str,
    index: usize,
) -> String {
    format!("{league}_{home}_{away}_{date}_{time}_{index}")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

fn fixture_tables<'a>(document: &'a Html) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    let mut tables = Vec::new();
    for raw in FIXTURE_TABLE_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for table in document.select(&selector) {
            if seen.insert(table.id()) {
                tables.push(table);
            }
        }
    }
    tables
}

fn parse_fixture_row(
    row: &ElementRef<'_>,
    cells: &[ElementRef<'_>],
    index: usize,
    league: &str,
    round: Option<&str>,
    ctx: &FixtureContext<'_>,
) -> Result<Option<FixtureRow>> {
    if cells.len() < 5 {
        return Err(anyhow!("expected at least 5 cells, got {}", cells.len()));
    }

    let date = extract_date(&cell_text(&cells[0]));
    let time = cell_text(&cells[1]);
    let (home_team, home_logo) = team_cell(&cells[2]);
    let score = parse_score(&cell_text(&cells[3]));
    let (away_team, away_logo) = team_cell(&cells[4]);
    let venue = cells.get(5).map(cell_text).unwrap_or_default();

    if home_team.is_empty() || away_team.is_empty() {
        return Err(anyhow!("missing team name"));
    }

    let club = ctx.club.to_lowercase();
    if !home_team.to_lowercase().contains(&club) && !away_team.to_lowercase().contains(&club) {
        return Ok(None);
    }

    let match_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok();
    let status = (ctx.status_rule)(score, match_date, ctx.today);

    Ok(Some(FixtureRow {
        fingerprint: fingerprint(league, &home_team, &away_team, &date, &time, index),
        date,
        time,
        home_team,
        away_team,
        home_logo,
        away_logo,
        home_score: score.map(|(h, _)| h),
        away_score: score.map(|(_, a)| a),
        venue,
        league: league.to_string(),
        status,
        round: round.map(str::to_string),
        detail_url: detail_url(row, ctx.origin),
        statistics: None,
        events: None,
    }))
}

/// The date sits inside free text as "YYYY MM DD"; anything else leaves the
/// date empty rather than failing the row.
fn extract_date(text: &str) -> String {
    let Some(caps) = DATE_RE.captures(text) else {
        return String::new();
    };
    let (year, month, day) = (&caps[1], &caps[2], &caps[3]);
    let iso = format!("{year}-{month}-{day}");
    match NaiveDate::parse_from_str(&iso, "%Y-%m-%d") {
        Ok(_) => iso,
        Err(_) => String::new(),
    }
}

/// Try the score patterns against the whitespace-collapsed cell text. An
/// empty or placeholder cell ("-", "- -") carries no score.
pub(crate) fn parse_score(text: &str) -> Option<(u32, u32)> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '-' || c == ' ') {
        return None;
    }
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&cleaned) {
            let home = caps[1].parse().ok()?;
            let away = caps[2].parse().ok()?;
            return Some((home, away));
        }
    }
    None
}

fn team_cell(cell: &ElementRef<'_>) -> (String, Option<String>) {
    let mut name = String::new();
    for raw in TEAM_NAME_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(el) = cell.select(&selector).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                name = text;
                break;
            }
        }
    }
    if name.is_empty() {
        name = element_text(cell);
    }

    let mut logo = None;
    static STYLED: Lazy<Selector> =
        Lazy::new(|| Selector::parse("[style]").expect("valid selector"));
    for el in cell.select(&STYLED) {
        if let Some(style) = el.value().attr("style")
            && let Some(caps) = STYLE_URL_RE.captures(style)
        {
            logo = Some(caps[1].trim().to_string());
            break;
        }
    }

    (name, logo)
}

/// The "match information" link per row, qualified to an absolute URL.
fn detail_url(row: &ElementRef<'_>, origin: &str) -> Option<String> {
    static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
    for link in row.select(&LINKS) {
        let href = link.value().attr("href")?;
        let text = element_text(&link).to_lowercase();
        if text.contains("informacija") || href.contains("rungtynes") {
            return Some(qualify_url(origin, href));
        }
    }
    None
}

fn qualify_url(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Round label from the page-level headings: digits followed by "TURAS".
fn page_round(document: &Html) -> Option<String> {
    static HEADINGS: Lazy<Selector> =
        Lazy::new(|| Selector::parse("h1, h2, h3, .page-title").expect("valid selector"));
    for heading in document.select(&HEADINGS) {
        let text = element_text(&heading);
        if let Some(m) = ROUND_RE.find(&text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

fn collect_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
    row.select(&CELLS).collect()
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    element_text(cell)
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_passed_means_completed, extract_date, fingerprint, parse_score};
    use crate::records::FixtureStatus;

    #[test]
    fn score_patterns_tolerate_separator_drift() {
        assert_eq!(parse_score("2 - 1"), Some((2, 1)));
        assert_eq!(parse_score("2-1"), Some((2, 1)));
        assert_eq!(parse_score("0 : 0"), Some((0, 0)));
        assert_eq!(parse_score("3\n2"), Some((3, 2)));
        assert_eq!(parse_score("4 0"), Some((4, 0)));
        assert_eq!(parse_score("-"), None);
        assert_eq!(parse_score("- -"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn fingerprint_is_lowercase_alnum_underscore() {
        let fp = fingerprint("a-lyga", "FK Banga", "Žalgiris", "2025-03-15", "18:00", 4);
        assert_eq!(fp, "alyga_fkbanga_algiris_20250315_1800_4");
        assert!(fp.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn date_extraction_requires_full_pattern() {
        assert_eq!(extract_date("Šeštadienis, 2025 03 15"), "2025-03-15");
        assert_eq!(extract_date("2025 13 40"), "");
        assert_eq!(extract_date("kovo 15"), "");
    }

    #[test]
    fn status_rule_prefers_score_then_date() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 3, 15);
        let future = NaiveDate::from_ymd_opt(2025, 9, 1);
        assert_eq!(
            date_passed_means_completed(Some((1, 0)), future, today),
            FixtureStatus::Completed
        );
        assert_eq!(
            date_passed_means_completed(None, past, today),
            FixtureStatus::Completed
        );
        assert_eq!(
            date_passed_means_completed(None, future, today),
            FixtureStatus::Upcoming
        );
        assert_eq!(
            date_passed_means_completed(None, None, today),
            FixtureStatus::Upcoming
        );
        assert_eq!(
            date_passed_means_completed(None, Some(today), today),
            FixtureStatus::Upcoming
        );
    }
}

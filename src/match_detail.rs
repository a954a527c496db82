use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::records::{EventKind, MatchEvent, MatchStatistics, StatPair, TeamSide};

// Structured per-minute timeline, when the detail page has one. Preferred
// over the keyword scan because entries carry category and side classes.
const TIMELINE_ENTRY_SELECTORS: &[&str] = &[
    ".match-timeline .timeline-event",
    ".match-timeline li",
    ".timeline .timeline-event",
];

// Narrower container for the keyword scan; whole document when absent.
const STATS_CONTAINER_SELECTORS: &[&str] = &[".stats-tab", "#statistika", ".match-stats"];

// Text source for the event extraction.
const PROGRESS_TAB_SELECTORS: &[&str] = &[".match-progress", "#eiga", ".progress-tab"];

// Class-name fragments per statistic category, Lithuanian first since that is
// what the site mostly serves. For each category the first two matching
// elements are read as home and away.
const KEYWORD_CATEGORIES: &[(StatKey, &[&str])] = &[
    (StatKey::Possession, &["valdymas", "possession"]),
    (StatKey::Shots, &["smugiai", "shots-total"]),
    (StatKey::ShotsOnTarget, &["taiklus", "on-target"]),
    (StatKey::Corners, &["kampiniai", "corner"]),
    (StatKey::Fouls, &["pazeidimai", "foul"]),
    (StatKey::YellowCards, &["geltonos", "yellow"]),
    (StatKey::RedCards, &["raudonos", "red"]),
    (StatKey::Offsides, &["nuosales", "offside"]),
];

// Strings the free-text patterns keep capturing that are never player names:
// tab labels, section headings, team and sponsor names.
const NON_PLAYER_PHRASES: &[&str] = &[
    "statistika",
    "naujienos",
    "apžvalga",
    "sudėtys",
    "rungtynių eiga",
    "tvarkaraštis",
    "turnyrinė lentelė",
    "įvartis",
    "pakeitimas",
    "kortelė",
    "teisėjas",
    "topsport",
    "banga",
    "žalgiris",
    "panevėžys",
    "hegelmann",
];

// "J. Petrauskas 23'" — name words then the minute tick. Name words never
// span a line break; each commentary entry sits on its own line.
static NAME_THEN_MINUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-ZĄČĘĖĮŠŲŪŽ][A-Za-zĄČĘĖĮŠŲŪŽąčęėįšųūž'.\-]*(?:[^\S\r\n]+[A-ZĄČĘĖĮŠŲŪŽ][A-Za-zĄČĘĖĮŠŲŪŽąčęėįšųūž'.\-]*){0,3})[^\S\r\n]+(\d{1,3})['’]",
    )
    .expect("valid regex")
});

// "23' min J. Petrauskas" — the same information in the other layout.
static MINUTE_THEN_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{1,3})['’][^\S\r\n]*min\.?[^\S\r\n]*([A-ZĄČĘĖĮŠŲŪŽ][A-Za-zĄČĘĖĮŠŲŪŽąčęėįšųūž'.\-]*(?:[^\S\r\n]+[A-ZĄČĘĖĮŠŲŪŽ][A-Za-zĄČĘĖĮŠŲŪŽąčęėįšųūž'.\-]*){0,3})",
    )
    .expect("valid regex")
});

static FIRST_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatKey {
    Possession,
    Shots,
    ShotsOnTarget,
    Corners,
    Fouls,
    YellowCards,
    RedCards,
    Offsides,
}

/// Derive per-side match statistics from a detail page. Returns `None` when
/// no category yielded data at all.
pub fn parse_statistics(html: &str) -> Option<MatchStatistics> {
    let document = Html::parse_document(html);

    let entries = timeline_entries(&document);
    let stats = if entries.is_empty() {
        keyword_scan(&document)
    } else {
        tally_timeline(&entries)
    };

    if stats.is_empty() { None } else { Some(stats) }
}

fn timeline_entries<'a>(document: &'a Html) -> Vec<ElementRef<'a>> {
    for raw in TIMELINE_ENTRY_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let entries: Vec<_> = document.select(&selector).collect();
        if !entries.is_empty() {
            return entries;
        }
    }
    Vec::new()
}

/// Timeline path: each entry's class names carry the category (goal, yellow,
/// red, substitution) and the side (left = home, right = away). A category is
/// reported only when at least one side tallied non-zero.
fn tally_timeline(entries: &[ElementRef<'_>]) -> MatchStatistics {
    let mut goals = (0u32, 0u32);
    let mut yellows = (0u32, 0u32);
    let mut reds = (0u32, 0u32);
    let mut subs = (0u32, 0u32);

    for entry in entries {
        let class = entry.value().attr("class").unwrap_or_default().to_lowercase();
        let away = class.contains("right") || class.contains("away");

        let counter = if class.contains("goal") {
            &mut goals
        } else if class.contains("yellow") {
            &mut yellows
        } else if class.contains("red") {
            &mut reds
        } else if class.contains("sub") {
            &mut subs
        } else {
            continue;
        };
        if away {
            counter.1 += 1;
        } else {
            counter.0 += 1;
        }
    }

    MatchStatistics {
        goals: nonzero_pair(goals),
        yellow_cards: nonzero_pair(yellows),
        red_cards: nonzero_pair(reds),
        substitutions: nonzero_pair(subs),
        ..MatchStatistics::default()
    }
}

fn nonzero_pair((home, away): (u32, u32)) -> Option<StatPair> {
    if home == 0 && away == 0 {
        None
    } else {
        Some(StatPair { home, away })
    }
}

/// Fallback path: scan classed elements for per-category keyword fragments.
/// The first two matches per category are home and away; the category is
/// reported only when a number was extracted from both.
fn keyword_scan(document: &Html) -> MatchStatistics {
    static CLASSED: Lazy<Selector> =
        Lazy::new(|| Selector::parse("[class]").expect("valid selector"));

    let scope = stats_container(document);
    let candidates: Vec<(String, Option<u32>)> = match scope {
        Some(container) => container
            .select(&CLASSED)
            .map(|el| (element_class(&el), first_number(&element_text(&el))))
            .collect(),
        None => document
            .select(&CLASSED)
            .map(|el| (element_class(&el), first_number(&element_text(&el))))
            .collect(),
    };

    let mut stats = MatchStatistics::default();
    for (key, fragments) in KEYWORD_CATEGORIES {
        let Some(pair) = scan_category(&candidates, fragments) else {
            continue;
        };
        match key {
            StatKey::Possession => stats.possession = Some(pair),
            StatKey::Shots => stats.shots = Some(pair),
            StatKey::ShotsOnTarget => stats.shots_on_target = Some(pair),
            StatKey::Corners => stats.corners = Some(pair),
            StatKey::Fouls => stats.fouls = Some(pair),
            StatKey::YellowCards => stats.yellow_cards = Some(pair),
            StatKey::RedCards => stats.red_cards = Some(pair),
            StatKey::Offsides => stats.offsides = Some(pair),
        }
    }
    stats
}

fn stats_container<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    for raw in STATS_CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            return Some(container);
        }
    }
    None
}

fn scan_category(candidates: &[(String, Option<u32>)], fragments: &[&str]) -> Option<StatPair> {
    let mut found = candidates
        .iter()
        .filter(|(class, _)| fragments.iter().any(|fragment| class.contains(fragment)))
        .map(|(_, number)| *number);

    let home = found.next()??;
    let away = found.next()??;
    Some(StatPair { home, away })
}

/// Recover (player, minute) pairs from the match commentary text. The text
/// renders this two ways, so both patterns run and their matches are pooled,
/// then bounds-checked, noise-filtered, deduplicated by (minute, player) and
/// sorted by minute. Category and side are not reliably recoverable from the
/// text, so every event is `Other`/`Home`.
pub fn parse_events(html: &str) -> Option<Vec<MatchEvent>> {
    let document = Html::parse_document(html);
    let text = progress_text(&document);

    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let mut events = Vec::new();

    let pairs = NAME_THEN_MINUTE_RE
        .captures_iter(&text)
        .filter_map(|caps| {
            let minute = caps[2].parse::<u32>().ok()?;
            Some((caps[1].trim().to_string(), minute))
        })
        .chain(MINUTE_THEN_NAME_RE.captures_iter(&text).filter_map(|caps| {
            let minute = caps[1].parse::<u32>().ok()?;
            Some((caps[2].trim().to_string(), minute))
        }));

    for (player, minute) in pairs {
        if !(1..=120).contains(&minute) {
            continue;
        }
        if player.chars().count() < 2 || is_non_player(&player) {
            continue;
        }
        if !seen.insert((minute, player.clone())) {
            continue;
        }
        events.push(MatchEvent {
            minute,
            kind: EventKind::Other,
            player,
            team: TeamSide::Home,
            detail: None,
        });
    }

    events.sort_by_key(|event| event.minute);
    if events.is_empty() { None } else { Some(events) }
}

fn progress_text(document: &Html) -> String {
    for raw in PROGRESS_TAB_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(tab) = document.select(&selector).next() {
            let text = tab.text().collect::<String>();
            if !text.trim().is_empty() {
                return text;
            }
        }
    }
    document.root_element().text().collect::<String>()
}

fn is_non_player(player: &str) -> bool {
    let lowered = player.to_lowercase();
    NON_PLAYER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

fn element_class(el: &ElementRef<'_>) -> String {
    el.value().attr("class").unwrap_or_default().to_lowercase()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

fn first_number(text: &str) -> Option<u32> {
    FIRST_NUMBER_RE.find(text)?.as_str().parse().ok()
}

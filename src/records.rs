use serde::{Deserialize, Serialize};

/// One team's row in a league table snapshot. Snapshots are replaced whole on
/// every scrape, keyed by `league`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: u32,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    pub league: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Upcoming,
    Completed,
    // Part of the persisted vocabulary; the fixtures parser never derives it.
    Live,
}

/// One scheduled or played match involving the club. Upserted by
/// `fingerprint`, never deleted by the scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRow {
    pub fingerprint: String,
    /// ISO yyyy-mm-dd, or empty when no date pattern was found in the row.
    pub date: String,
    /// Raw cell text, whatever the source shows ("18:00", "TBD", ...).
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    pub venue: String,
    pub league: String,
    pub status: FixtureStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<MatchStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<MatchEvent>>,
}

impl FixtureRow {
    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPair {
    pub home: u32,
    pub away: u32,
}

/// Sparse per-match statistics. A category is present only when the detail
/// page actually yielded data for it; absent categories stay off the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots_on_target: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fouls: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yellow_cards: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red_cards: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsides: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<StatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitutions: Option<StatPair>,
}

impl MatchStatistics {
    pub fn is_empty(&self) -> bool {
        self.possession.is_none()
            && self.shots.is_none()
            && self.shots_on_target.is_none()
            && self.corners.is_none()
            && self.fouls.is_none()
            && self.yellow_cards.is_none()
            && self.red_cards.is_none()
            && self.offsides.is_none()
            && self.goals.is_none()
            && self.substitutions.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    Assist,
    YellowCard,
    RedCard,
    Substitution,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

/// One moment in a match chronology, recovered from free-text commentary.
/// The text patterns yield player and minute only, so `kind` and `team` carry
/// the `Other`/`Home` defaults the source leaves us with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// 1..=120; anything outside that range is rejected at parse time.
    pub minute: u32,
    pub kind: EventKind,
    pub player: String,
    pub team: TeamSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

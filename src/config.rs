use std::time::Duration;

use anyhow::{Context, Result};

use crate::fetch::DEFAULT_RETRIES;
use crate::fixtures::{StatusRule, date_passed_means_completed};

const SOURCE_ORIGIN: &str = "https://www.lietuvosfutbolas.lt";

#[derive(Debug, Clone)]
pub struct LeagueConfig {
    /// Stable league key used in fingerprints and as the standings upsert key.
    pub key: String,
    pub standings_url: String,
    pub fixtures_url: String,
}

impl LeagueConfig {
    pub fn new(key: &str, standings_url: &str, fixtures_url: &str) -> Self {
        Self {
            key: key.to_string(),
            standings_url: standings_url.to_string(),
            fixtures_url: fixtures_url.to_string(),
        }
    }
}

/// Everything the engine needs, passed in at construction so tests can point
/// it at fixture URLs instead of the live site.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub leagues: Vec<LeagueConfig>,
    /// Case-insensitive substring that picks the club's rows out of a full
    /// league fixture listing.
    pub club: String,
    /// Origin used to qualify relative detail-page hrefs.
    pub origin: String,
    /// Pause between consecutive detail-page fetches.
    pub detail_delay: Duration,
    /// Pause between batches in the resumable backfill script.
    pub batch_delay: Duration,
    pub retries: u32,
    pub status_rule: StatusRule,
}

impl ScrapeConfig {
    pub fn new(leagues: Vec<LeagueConfig>, club: &str, origin: &str) -> Self {
        Self {
            leagues,
            club: club.to_string(),
            origin: origin.to_string(),
            detail_delay: Duration::from_secs(1),
            batch_delay: Duration::from_secs(3),
            retries: DEFAULT_RETRIES,
            status_rule: date_passed_means_completed,
        }
    }

    pub fn with_club(mut self, club: &str) -> Self {
        self.club = club.to_string();
        self
    }
}

/// The production league list for the club. Kept here rather than as hidden
/// module-level state so the orchestrator receives it explicitly.
pub fn default_config() -> ScrapeConfig {
    ScrapeConfig::new(
        vec![
            LeagueConfig::new(
                "a-lyga",
                "https://www.lietuvosfutbolas.lt/a-lyga/turnyrine-lentele/",
                "https://www.lietuvosfutbolas.lt/a-lyga/tvarkarastis-ir-rezultatai/",
            ),
            LeagueConfig::new(
                "pirma-lyga",
                "https://www.lietuvosfutbolas.lt/pirma-lyga/turnyrine-lentele/",
                "https://www.lietuvosfutbolas.lt/pirma-lyga/tvarkarastis-ir-rezultatai/",
            ),
        ],
        "Banga",
        SOURCE_ORIGIN,
    )
}

/// Connection settings for the platform database, read from the environment
/// (bins call `dotenvy::dotenv()` first so local runs can use a `.env` file).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub service_key: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL").context("SUPABASE_URL is not set")?;
        let service_key =
            std::env::var("SUPABASE_SERVICE_KEY").context("SUPABASE_SERVICE_KEY is not set")?;
        Ok(Self { url, service_key })
    }
}

use std::thread;

use anyhow::Result;
use chrono::Utc;
use log::{error, info, warn};
use reqwest::blocking::Client;

use crate::config::ScrapeConfig;
use crate::fetch::{fetch_with_retry_attempts, http_client};
use crate::fixtures::{FixtureContext, parse_fixtures};
use crate::match_detail::{parse_events, parse_statistics};
use crate::records::{FixtureRow, MatchEvent, MatchStatistics, StandingRow};
use crate::standings::parse_standings;

#[derive(Debug, Clone)]
pub struct LeagueStandings {
    pub league: String,
    pub rows: Vec<StandingRow>,
}

/// Sequences fetch + parse across the configured leagues. Everything is
/// strictly sequential and self-throttled; a failed league, fixture or detail
/// page is logged and skipped, never allowed to abort the run.
pub struct ScrapeEngine {
    config: ScrapeConfig,
    client: &'static Client,
}

impl ScrapeEngine {
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Standings for every configured league. Leagues that yielded no rows
    /// (fetch failure or empty parse) are left out of the result.
    pub fn scrape_all_leagues(&self) -> Vec<LeagueStandings> {
        let stamped_at = Utc::now().to_rfc3339();
        let mut out = Vec::new();

        for league in &self.config.leagues {
            info!("scraping standings for {}", league.key);
            let html = match fetch_with_retry_attempts(
                self.client,
                &league.standings_url,
                self.config.retries,
            ) {
                Ok(html) => html,
                Err(err) => {
                    error!("standings fetch failed for {}: {err:#}", league.key);
                    continue;
                }
            };

            let rows = parse_standings(&html, &league.key, &stamped_at);
            if rows.is_empty() {
                warn!("no standings rows for {}", league.key);
                continue;
            }
            out.push(LeagueStandings {
                league: league.key.clone(),
                rows,
            });
        }

        out
    }

    /// The club's fixtures across every configured league.
    pub fn scrape_all_fixtures(&self) -> Vec<FixtureRow> {
        let today = Utc::now().date_naive();
        let mut out = Vec::new();

        for league in &self.config.leagues {
            info!("scraping fixtures for {}", league.key);
            let html = match fetch_with_retry_attempts(
                self.client,
                &league.fixtures_url,
                self.config.retries,
            ) {
                Ok(html) => html,
                Err(err) => {
                    error!("fixtures fetch failed for {}: {err:#}", league.key);
                    continue;
                }
            };

            let ctx = FixtureContext {
                club: &self.config.club,
                origin: &self.config.origin,
                today,
                status_rule: self.config.status_rule,
            };
            out.extend(parse_fixtures(&html, &league.key, &ctx));
        }

        out
    }

    /// Fixtures, then one detail-page pass for every completed fixture that
    /// has a detail URL, pacing the fetches so the source site never sees a
    /// burst.
    pub fn scrape_all_fixtures_with_statistics(&self) -> Vec<FixtureRow> {
        let mut fixtures = self.scrape_all_fixtures();

        for fixture in fixtures.iter_mut() {
            if !fixture.is_completed() {
                continue;
            }
            let Some(url) = fixture.detail_url.clone() else {
                continue;
            };

            match self.scrape_fixture_detail(&url) {
                Ok((statistics, events)) => {
                    fixture.statistics = statistics;
                    fixture.events = events;
                }
                Err(err) => {
                    error!("detail fetch failed for {}: {err:#}", fixture.fingerprint);
                }
            }
            thread::sleep(self.config.detail_delay);
        }

        fixtures
    }

    /// One fixture's detail page: statistics and the event timeline.
    pub fn scrape_fixture_detail(
        &self,
        detail_url: &str,
    ) -> Result<(Option<MatchStatistics>, Option<Vec<MatchEvent>>)> {
        let html = fetch_with_retry_attempts(self.client, detail_url, self.config.retries)?;
        Ok((parse_statistics(&html), parse_events(&html)))
    }
}

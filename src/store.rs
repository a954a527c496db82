use std::fmt;

use anyhow::{Context, Result, anyhow};
use log::error;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use crate::config::StoreConfig;
use crate::fetch::http_client;
use crate::records::{FixtureRow, MatchEvent, MatchStatistics, StandingRow};

const STANDINGS_TABLE: &str = "league_standings";
const FIXTURES_TABLE: &str = "fixtures";

/// Thin client for the platform database's REST interface. The scraper treats
/// it as a sink; the only read is the missing-statistics queue for the
/// resumable backfill script.
pub struct Store {
    base: String,
    service_key: String,
    client: &'static Client,
}

/// A fixture still waiting for its detail pass.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingFixture {
    pub fingerprint: String,
    pub detail_url: String,
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl RunSummary {
    pub fn merge(&mut self, other: &RunSummary) {
        self.processed += other.processed;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.errors.extend(other.errors.iter().cloned());
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}, succeeded {}, failed {}, skipped {}",
            self.processed, self.succeeded, self.failed, self.skipped
        )
    }
}

impl Store {
    pub fn new(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            base: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key,
            client: http_client()?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    /// Replace a league's standings snapshot whole: delete the previous rows
    /// for the league, then insert the fresh ones. Keyed by league, never
    /// merged row-by-row, so teams that dropped out of the table disappear.
    pub fn replace_standings(&self, league: &str, rows: &[StandingRow]) -> Result<()> {
        let delete_url = format!("{}?league=eq.{league}", self.endpoint(STANDINGS_TABLE));
        let resp = self
            .request(Method::DELETE, &delete_url)
            .send()
            .context("delete standings snapshot")?;
        ensure_success(resp, "delete standings snapshot")?;

        if rows.is_empty() {
            return Ok(());
        }
        let resp = self
            .request(Method::POST, &self.endpoint(STANDINGS_TABLE))
            .json(rows)
            .send()
            .context("insert standings snapshot")?;
        ensure_success(resp, "insert standings snapshot")
    }

    /// Upsert fixtures one at a time, keyed by fingerprint, so one bad row
    /// cannot take the rest of the batch down with it.
    pub fn upsert_fixtures(&self, rows: &[FixtureRow]) -> RunSummary {
        let mut summary = RunSummary::default();
        for row in rows {
            summary.processed += 1;
            match self.upsert_fixture(row) {
                Ok(()) => summary.succeeded += 1,
                Err(err) => {
                    summary.failed += 1;
                    error!("upsert failed for {}: {err:#}", row.fingerprint);
                    summary.errors.push(format!("{}: {err:#}", row.fingerprint));
                }
            }
        }
        summary
    }

    fn upsert_fixture(&self, row: &FixtureRow) -> Result<()> {
        let url = format!(
            "{}?on_conflict=fingerprint",
            self.endpoint(FIXTURES_TABLE)
        );
        let resp = self
            .request(Method::POST, &url)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[row])
            .send()
            .context("upsert fixture")?;
        ensure_success(resp, "upsert fixture")
    }

    /// Merge the detail blobs into an existing fixture row; every other
    /// column is left untouched.
    pub fn update_fixture_details(
        &self,
        fingerprint: &str,
        statistics: &Option<MatchStatistics>,
        events: &Option<Vec<MatchEvent>>,
    ) -> Result<()> {
        let url = format!(
            "{}?fingerprint=eq.{fingerprint}",
            self.endpoint(FIXTURES_TABLE)
        );
        let body = json!({
            "statistics": statistics,
            "events": events,
        });
        let resp = self
            .request(Method::PATCH, &url)
            .json(&body)
            .send()
            .context("update fixture details")?;
        ensure_success(resp, "update fixture details")
    }

    /// The backfill work queue: completed fixtures with a detail URL whose
    /// statistics blob is still null.
    pub fn fixtures_missing_statistics(&self, limit: usize) -> Result<Vec<PendingFixture>> {
        let url = format!(
            "{}?select=fingerprint,detail_url&status=eq.completed&statistics=is.null&detail_url=not.is.null&limit={limit}",
            self.endpoint(FIXTURES_TABLE)
        );
        let resp = self
            .request(Method::GET, &url)
            .send()
            .context("query pending fixtures")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("query pending fixtures: http {status}: {body}"));
        }
        resp.json().context("decode pending fixtures")
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

fn ensure_success(resp: Response, what: &str) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().unwrap_or_default();
    Err(anyhow!("{what}: http {status}: {body}"))
}

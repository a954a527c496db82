use anyhow::{Result, anyhow};

use lff_scrape::config::default_config;
use lff_scrape::engine::ScrapeEngine;

/// Ad-hoc inspection: scrape fixtures for an arbitrary team name across the
/// configured leagues and print what was found, without persisting anything.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let team = std::env::args()
        .nth(1)
        .filter(|arg| !arg.trim().is_empty())
        .ok_or_else(|| anyhow!("usage: scrape_team <team name>"))?;

    let engine = ScrapeEngine::new(default_config().with_club(&team))?;
    println!("Scraping fixtures for {team}");

    let fixtures = engine.scrape_all_fixtures();
    for fixture in &fixtures {
        let score = match (fixture.home_score, fixture.away_score) {
            (Some(home), Some(away)) => format!("{home}-{away}"),
            _ => "-".to_string(),
        };
        println!(
            "{} {} | {} vs {} | {} | {:?}",
            fixture.date, fixture.time, fixture.home_team, fixture.away_team, score, fixture.status
        );
    }
    println!("{} fixtures found", fixtures.len());

    Ok(())
}

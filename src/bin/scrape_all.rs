use anyhow::Result;

use lff_scrape::config::default_config;
use lff_scrape::engine::ScrapeEngine;
use lff_scrape::store::{RunSummary, Store};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let engine = ScrapeEngine::new(default_config())?;
    let store = Store::from_env()?;

    println!(
        "Scraping standings for {} leagues",
        engine.config().leagues.len()
    );
    let standings = engine.scrape_all_leagues();

    let mut summary = RunSummary::default();
    for league in &standings {
        summary.processed += 1;
        println!("{}: {} standings rows", league.league, league.rows.len());
        match store.replace_standings(&league.league, &league.rows) {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                summary.failed += 1;
                summary.errors.push(format!("{}: {err:#}", league.league));
            }
        }
    }

    println!("Scraping fixtures for {}", engine.config().club);
    let fixtures = engine.scrape_all_fixtures();
    println!("{} fixtures found", fixtures.len());
    summary.merge(&store.upsert_fixtures(&fixtures));

    println!("Run finished: {summary}");
    for err in summary.errors.iter().take(8) {
        println!(" - {err}");
    }

    Ok(())
}

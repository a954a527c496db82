use anyhow::Result;

use lff_scrape::config::default_config;
use lff_scrape::engine::ScrapeEngine;
use lff_scrape::store::Store;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let engine = ScrapeEngine::new(default_config())?;
    let store = Store::from_env()?;

    println!("Scraping fixtures with statistics for {}", engine.config().club);
    let fixtures = engine.scrape_all_fixtures_with_statistics();

    let with_stats = fixtures.iter().filter(|f| f.statistics.is_some()).count();
    let with_events = fixtures.iter().filter(|f| f.events.is_some()).count();
    println!(
        "{} fixtures found ({with_stats} with statistics, {with_events} with events)",
        fixtures.len()
    );

    let summary = store.upsert_fixtures(&fixtures);
    println!("Run finished: {summary}");
    for err in summary.errors.iter().take(8) {
        println!(" - {err}");
    }

    Ok(())
}

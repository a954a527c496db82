use std::collections::HashSet;
use std::thread;

use anyhow::Result;

use lff_scrape::config::default_config;
use lff_scrape::engine::ScrapeEngine;
use lff_scrape::store::{RunSummary, Store};

const DEFAULT_BATCH_SIZE: usize = 5;
const MAX_BATCH_SIZE: usize = 10;

/// Backfills statistics and events for completed fixtures that are still
/// missing them. Processes the queue in small batches with a pause in
/// between; safe to kill and re-run, since finished fixtures drop out of the
/// queue and everything is keyed by fingerprint.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let batch_size = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(DEFAULT_BATCH_SIZE)
        .clamp(1, MAX_BATCH_SIZE);

    let engine = ScrapeEngine::new(default_config())?;
    let store = Store::from_env()?;

    let mut summary = RunSummary::default();
    let mut attempted: HashSet<String> = HashSet::new();

    loop {
        let pending = store.fixtures_missing_statistics(batch_size)?;
        // Fixtures whose detail page yields nothing stay in the queue; skip
        // anything already attempted this run so the loop terminates.
        let batch: Vec<_> = pending
            .into_iter()
            .filter(|p| !attempted.contains(&p.fingerprint))
            .collect();
        if batch.is_empty() {
            break;
        }

        println!("Processing batch of {}", batch.len());
        for pending in &batch {
            attempted.insert(pending.fingerprint.clone());
            summary.processed += 1;

            match engine.scrape_fixture_detail(&pending.detail_url) {
                Ok((None, None)) => {
                    println!("  {} -> no detail data", pending.fingerprint);
                    summary.skipped += 1;
                }
                Ok((statistics, events)) => {
                    match store.update_fixture_details(&pending.fingerprint, &statistics, &events) {
                        Ok(()) => {
                            println!("  {} -> updated", pending.fingerprint);
                            summary.succeeded += 1;
                        }
                        Err(err) => {
                            summary.failed += 1;
                            summary.errors.push(format!("{}: {err:#}", pending.fingerprint));
                        }
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    summary.errors.push(format!("{}: {err:#}", pending.fingerprint));
                }
            }
            thread::sleep(engine.config().detail_delay);
        }

        thread::sleep(engine.config().batch_delay);
    }

    println!("Backfill finished: {summary}");
    for err in summary.errors.iter().take(8) {
        println!(" - {err}");
    }

    Ok(())
}

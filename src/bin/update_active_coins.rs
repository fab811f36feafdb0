//! Offline alternative to the live active-coins endpoint: classifies every
//! icon symbol as active or inactive against CoinMarketCap and writes static
//! JSON snapshots for manual commit. Run by hand, not scheduled.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cryptoicons_api::icons;
use cryptoicons_api::market::batch::chunked;
use cryptoicons_api::market::{CmcClient, FixedDelayPacer, MarketError};
use cryptoicons_api::Config;

/// Smaller batches and a longer gap than the live endpoint: this tool runs
/// against a free-tier rate limit and nobody is waiting on it.
const BATCH_SIZE: usize = 10;
const DELAY_MS: u64 = 2500;
const OUTPUT_DIR: &str = "public/data";

#[derive(Serialize)]
struct SnapshotFile {
    timestamp: String,
    total: usize,
    symbols: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "update_active_coins=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting active coins update...");

    let config = Config::from_env();
    let Some(api_key) = config.api_key else {
        bail!("COINMARKETCAP_API_KEY not configured");
    };

    let client = CmcClient::new(api_key)?;

    let all_symbols = icons::query_symbols(&config.icons_dir)
        .with_context(|| format!("reading icons from {}", config.icons_dir.display()))?;
    info!("Total symbols found: {}", all_symbols.len());

    let batches = chunked(&all_symbols, BATCH_SIZE);
    info!(
        "Batch size: {}, API calls needed: {}",
        BATCH_SIZE,
        batches.len()
    );

    let mut pacer = FixedDelayPacer::from_millis(DELAY_MS);
    let mut active: BTreeSet<String> = BTreeSet::new();
    let mut inactive: BTreeSet<String> = BTreeSet::new();
    let mut successful_calls = 0;
    let mut failed_calls = 0;

    for (i, batch) in batches.iter().enumerate() {
        pacer.pace().await;
        info!("[{}/{}] Checking {} symbols", i + 1, batches.len(), batch.len());

        match client.map_listings(batch).await {
            Ok(entries) => {
                successful_calls += 1;

                let found: BTreeSet<String> = entries
                    .iter()
                    .filter(|entry| entry.is_active == Some(1))
                    .filter_map(|entry| entry.symbol.as_ref())
                    .map(|symbol| symbol.to_uppercase())
                    .collect();

                info!("Found {} active (out of {} returned)", found.len(), entries.len());

                for symbol in batch {
                    if found.contains(symbol) {
                        active.insert(symbol.clone());
                    } else {
                        // Not returned by an active-status lookup means delisted
                        // or unknown; either way it is not shown as active.
                        inactive.insert(symbol.clone());
                    }
                }
            }
            Err(MarketError::UpstreamStatus { status }) => {
                warn!("Batch failed with {}, retrying symbols individually", status);
                failed_calls += 1;

                for symbol in batch {
                    pacer.pace().await;
                    match client.map_listings(std::slice::from_ref(symbol)).await {
                        Ok(entries)
                            if entries.iter().any(|entry| entry.is_active == Some(1)) =>
                        {
                            info!("{} is active", symbol);
                            active.insert(symbol.clone());
                        }
                        Ok(_) => {
                            inactive.insert(symbol.clone());
                        }
                        Err(err) => {
                            warn!("{} failed/invalid: {}", symbol, err);
                            inactive.insert(symbol.clone());
                        }
                    }
                }
            }
            Err(err) => {
                error!("Batch error: {}", err);
                failed_calls += 1;
                inactive.extend(batch.iter().cloned());
            }
        }
    }

    info!(
        "Summary: {} successful calls, {} failed, {} active, {} inactive, {} total",
        successful_calls,
        failed_calls,
        active.len(),
        inactive.len(),
        active.len() + inactive.len()
    );

    write_snapshots(Path::new(OUTPUT_DIR), &all_symbols, &active, &inactive)?;
    info!("Saved JSON files to {}/ — commit them to the repo", OUTPUT_DIR);

    Ok(())
}

fn write_snapshots(
    dir: &Path,
    all_symbols: &[String],
    active: &BTreeSet<String>,
    inactive: &BTreeSet<String>,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let timestamp = chrono::Utc::now().to_rfc3339();
    let mut sorted_all = all_symbols.to_vec();
    sorted_all.sort();

    let files = [
        ("all-coins.json", sorted_all),
        ("active-coins.json", active.iter().cloned().collect()),
        ("inactive-coins.json", inactive.iter().cloned().collect()),
    ];

    for (name, symbols) in files {
        let snapshot = SnapshotFile {
            timestamp: timestamp.clone(),
            total: symbols.len(),
            symbols,
        };

        std::fs::write(dir.join(name), serde_json::to_string_pretty(&snapshot)?)
            .with_context(|| format!("writing {}", name))?;
    }

    Ok(())
}

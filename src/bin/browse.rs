//! Terminal view of the icon catalog. Fetches market data from a running
//! catalog server and prints the icons matching the given search text and
//! filter flags.
//!
//! Usage: browse [QUERY] [--top100] [--active]

use anyhow::{Context, Result};

use cryptoicons_api::filter::{filter_icons, FilterOptions};
use cryptoicons_api::icons;
use cryptoicons_api::market::MarketDataClient;
use cryptoicons_api::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut options = FilterOptions::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--top100" => options.top100_only = true,
            "--active" => options.active_only = true,
            query => options.query = query.to_string(),
        }
    }

    let config = Config::from_env();
    let icons = icons::scan_icon_dir(&config.icons_dir)
        .with_context(|| format!("reading icons from {}", config.icons_dir.display()))?;

    let base_url = std::env::var("ICON_API_URL")
        .unwrap_or_else(|_| format!("http://localhost:{}", config.port));

    let view = MarketDataClient::new(base_url)?.load().await;

    if !view.api_key_configured() {
        println!("(market filters disabled: no CoinMarketCap API key configured)");
    }
    if let Some(message) = view.error() {
        println!("({})", message);
    }

    let mut matches = filter_icons(&icons, &options, &view);
    matches.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    for icon in &matches {
        match &icon.symbol {
            Some(symbol) => println!("{:8} {}", symbol, icon.display_name),
            None => println!("{:8} {}", "-", icon.display_name),
        }
    }

    println!("\n{} of {} icons", matches.len(), icons.len());

    Ok(())
}

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cryptoicons_api::market::MarketDataService;
use cryptoicons_api::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptoicons_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting crypto icon catalog server...");

    let config = Config::from_env();

    if config.api_key.is_none() {
        info!("COINMARKETCAP_API_KEY not configured; market filters will be disabled");
    }

    let state = AppState {
        market: Arc::new(MarketDataService::from_config(&config)?),
        icons_dir: config.icons_dir.clone(),
    };

    let app = cryptoicons_api::server::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

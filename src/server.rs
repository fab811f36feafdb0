use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::Method,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::icons;
use crate::market::{handlers, MarketDataService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketDataService>,
    pub icons_dir: PathBuf,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Builds the full HTTP surface: market endpoints, the catalog listing, and
/// static icon files. Market routes are GET-only; axum answers other methods
/// with 405 and an `Allow: GET` header.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/market/top100", get(handlers::top100))
        .route("/api/market/active-coins", get(handlers::active_coins))
        .route("/api/icons", get(icons::list_icons))
        .nest_service("/icons", ServeDir::new(&state.icons_dir))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

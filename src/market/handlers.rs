use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

use super::MarketError;

#[derive(Debug, Serialize)]
struct SuccessBody<T> {
    success: bool,
    data: T,
    cached: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// GET /api/market/top100
pub async fn top100(State(state): State<AppState>) -> Response {
    respond(state.market.top100().await)
}

/// GET /api/market/active-coins
pub async fn active_coins(State(state): State<AppState>) -> Response {
    respond(state.market.active_coins().await)
}

/// Maps a service outcome onto the wire contract: data with a `cached` flag,
/// an unconfigured credential as a 200-level non-error, anything else as a
/// plain 500 with an opaque message.
fn respond<T: Serialize>(outcome: Result<super::service::MarketHit<T>, MarketError>) -> Response {
    match outcome {
        Ok(hit) => (
            StatusCode::OK,
            Json(SuccessBody {
                success: true,
                data: hit.data,
                cached: hit.cached,
            }),
        )
            .into_response(),
        Err(err @ MarketError::ApiKeyNotConfigured) => (
            StatusCode::OK,
            Json(ErrorBody {
                success: false,
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Market data request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    success: false,
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

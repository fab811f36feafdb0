use serde::Deserialize;

use super::{normalize_symbol, ActiveSymbolSet, MarketError, MarketSnapshot};

/// Shown when the catalog endpoints fail for any reason other than a
/// missing API key. The rest of the catalog keeps working.
pub const DEGRADED_MESSAGE: &str = "Failed to load market data. Filter features may be limited.";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Ok {
        #[allow(dead_code)]
        success: bool,
        data: T,
        cached: bool,
    },
    Err {
        #[allow(dead_code)]
        success: bool,
        error: String,
    },
}

/// Consumer-side client for the two catalog market endpoints.
pub struct MarketDataClient {
    http: reqwest::Client,
    base_url: String,
}

/// What a load attempt produced. Missing snapshots make both predicates
/// permissive: no data means show everything, never hide everything.
#[derive(Debug, Default)]
pub struct MarketView {
    market: Option<MarketSnapshot>,
    active: Option<ActiveSymbolSet>,
    unconfigured: bool,
    error: Option<String>,
}

impl MarketDataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Requests both endpoints concurrently and folds the outcomes into a
    /// [`MarketView`]. Never fails: an unreachable or erroring server
    /// degrades the view instead.
    pub async fn load(&self) -> MarketView {
        let (top100, active) = tokio::join!(
            self.fetch::<MarketSnapshot>("/api/market/top100"),
            self.fetch::<ActiveSymbolSet>("/api/market/active-coins"),
        );

        let (top100, active) = match (top100, active) {
            (Ok(top100), Ok(active)) => (top100, active),
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!("Failed to load market data: {}", err);
                return MarketView {
                    error: Some(DEGRADED_MESSAGE.to_string()),
                    ..MarketView::default()
                };
            }
        };

        match (top100, active) {
            (
                Envelope::Ok { data: market, .. },
                Envelope::Ok {
                    data: active,
                    cached,
                    ..
                },
            ) => {
                if !cached {
                    tracing::info!(
                        "Active coins check: {} API calls made",
                        active.api_calls_made
                    );
                }
                MarketView {
                    market: Some(market),
                    active: Some(active),
                    ..MarketView::default()
                }
            }
            (Envelope::Err { error, .. }, _) | (_, Envelope::Err { error, .. }) => {
                if error == "API_KEY_NOT_CONFIGURED" {
                    // Feature disabled, not broken: no message for the user.
                    MarketView {
                        unconfigured: true,
                        ..MarketView::default()
                    }
                } else {
                    tracing::error!("Market data endpoint reported: {}", error);
                    MarketView {
                        error: Some(DEGRADED_MESSAGE.to_string()),
                        ..MarketView::default()
                    }
                }
            }
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, reqwest::Error> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl MarketView {
    /// A view built from already-loaded snapshots, e.g. the static JSON
    /// files written by the snapshot tool.
    pub fn from_snapshots(
        market: Option<MarketSnapshot>,
        active: Option<ActiveSymbolSet>,
    ) -> Self {
        Self {
            market,
            active,
            ..Self::default()
        }
    }

    /// True when the listing snapshot is absent (permissive default) or the
    /// symbol appears in it.
    pub fn is_top100(&self, symbol: &str) -> bool {
        let Some(market) = &self.market else {
            return true;
        };

        let normalized = normalize_symbol(symbol);
        market
            .coins
            .iter()
            .any(|coin| coin.symbol.to_uppercase() == normalized)
    }

    /// True when the active-symbol snapshot is absent or contains the
    /// symbol. The active-coins endpoint is the single source of truth for
    /// listing status; the per-coin flag on the top-100 payload is not
    /// consulted.
    pub fn is_active(&self, symbol: &str) -> bool {
        let Some(active) = &self.active else {
            return true;
        };

        active.contains(&normalize_symbol(symbol))
    }

    pub fn has_listing(&self) -> bool {
        self.market.is_some()
    }

    pub fn has_active_set(&self) -> bool {
        self.active.is_some()
    }

    pub fn api_key_configured(&self) -> bool {
        !self.unconfigured
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn success_routes() -> Router {
        Router::new()
            .route(
                "/api/market/top100",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": {
                            "coins": [
                                {"id": 1, "name": "Bitcoin", "symbol": "BTC", "cmc_rank": 1}
                            ],
                            "timestamp": 1_700_000_000_000i64
                        },
                        "cached": false
                    }))
                }),
            )
            .route(
                "/api/market/active-coins",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": {
                            "activeSymbols": ["BTC"],
                            "timestamp": 1_700_000_000_000i64,
                            "totalChecked": 2,
                            "apiCallsMade": 1
                        },
                        "cached": false
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn load_exposes_membership_predicates() {
        let base = serve(success_routes()).await;
        let view = MarketDataClient::new(base).unwrap().load().await;

        assert!(view.api_key_configured());
        assert!(view.error().is_none());
        assert!(view.is_top100(" btc "));
        assert!(!view.is_top100("DOGE"));
        assert!(view.is_active("btc"));
        assert!(!view.is_active("ETH"));
    }

    #[tokio::test]
    async fn unconfigured_key_disables_filtering_quietly() {
        let unconfigured = || async {
            Json(json!({"success": false, "error": "API_KEY_NOT_CONFIGURED"}))
        };
        let app = Router::new()
            .route("/api/market/top100", get(unconfigured))
            .route("/api/market/active-coins", get(unconfigured));

        let base = serve(app).await;
        let view = MarketDataClient::new(base).unwrap().load().await;

        assert!(!view.api_key_configured());
        assert!(view.error().is_none());
        // Permissive defaults: everything passes.
        assert!(view.is_top100("ANYTHING"));
        assert!(view.is_active("ANYTHING"));
    }

    #[tokio::test]
    async fn server_failure_degrades_with_a_generic_message() {
        let app = Router::new()
            .route(
                "/api/market/top100",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": {"coins": [], "timestamp": 0},
                        "cached": true
                    }))
                }),
            )
            .route(
                "/api/market/active-coins",
                get(|| async {
                    (
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"success": false, "error": "boom"})),
                    )
                }),
            );

        let base = serve(app).await;
        let view = MarketDataClient::new(base).unwrap().load().await;

        assert!(view.api_key_configured());
        assert_eq!(view.error(), Some(DEGRADED_MESSAGE));
        assert!(view.is_top100("ANYTHING"));
    }

    #[tokio::test]
    async fn unreachable_server_degrades() {
        let view = MarketDataClient::new("http://127.0.0.1:1")
            .unwrap()
            .load()
            .await;

        assert_eq!(view.error(), Some(DEGRADED_MESSAGE));
    }
}

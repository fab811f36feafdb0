pub mod batch;
pub mod cache;
pub mod client;
pub mod cmc;
pub mod handlers;
pub mod pacing;
pub mod service;

use serde::{Deserialize, Serialize};

pub use cache::TtlCache;
pub use client::{MarketDataClient, MarketView};
pub use cmc::{CmcClient, MarketDataApi};
pub use pacing::FixedDelayPacer;
pub use service::MarketDataService;

/// One entry of the top-100 listing, trimmed to the fields the catalog needs.
/// Wire names follow the upstream listing payload; `is_active` is absent on
/// the listings endpoint and only populated by map lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coin {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "cmc_rank")]
    pub rank: u32,
    #[serde(rename = "is_active", default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<i32>,
}

/// Point-in-time top-100 listing. Replaced wholesale on each refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    pub coins: Vec<Coin>,
    pub timestamp: i64,
}

/// Result of an active-listing sweep over the icon symbol universe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSymbolSet {
    pub active_symbols: Vec<String>,
    pub timestamp: i64,
    pub total_checked: usize,
    pub api_calls_made: usize,
}

impl ActiveSymbolSet {
    pub fn contains(&self, normalized_symbol: &str) -> bool {
        self.active_symbols.iter().any(|s| s == normalized_symbol)
    }
}

/// Everything that can go wrong between the cache boundary and the upstream
/// API. Upstream specifics stop here; handlers and the browser client only
/// see these variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Not a failure: the operator never supplied a key, so market features
    /// are disabled rather than broken.
    #[error("API_KEY_NOT_CONFIGURED")]
    ApiKeyNotConfigured,

    #[error("CoinMarketCap API error: {status}")]
    UpstreamStatus { status: u16 },

    #[error("CoinMarketCap request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read icon directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Millisecond wall clock, injectable so cache expiry is deterministic in
/// tests.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Uppercase-and-trim normalization applied to every symbol comparison.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

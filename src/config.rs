use std::env;
use std::path::PathBuf;

/// Values of COINMARKETCAP_API_KEY that mean "no key was actually provided".
const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Cache durations in milliseconds: 24 hours for the top-100 listing,
/// 7 days for the active-symbol set.
const DEFAULT_TOP100_TTL_MS: i64 = 86_400_000;
const DEFAULT_ACTIVE_TTL_MS: i64 = 604_800_000;

/// Server configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub icons_dir: PathBuf,
    pub api_key: Option<String>,
    pub top100_ttl_ms: i64,
    pub active_ttl_ms: i64,
    /// Symbols per upstream map call during an active-set refresh.
    pub batch_size: usize,
    /// Delay between consecutive upstream map calls.
    pub batch_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            icons_dir: env::var("ICONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/icons")),
            api_key: env::var("COINMARKETCAP_API_KEY")
                .ok()
                .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER),
            top100_ttl_ms: env::var("CMC_CACHE_DURATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOP100_TTL_MS),
            active_ttl_ms: env::var("CMC_ACTIVE_COINS_CACHE_DURATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACTIVE_TTL_MS),
            batch_size: 100,
            batch_delay_ms: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            icons_dir: PathBuf::from("public/icons"),
            api_key: None,
            top100_ttl_ms: DEFAULT_TOP100_TTL_MS,
            active_ttl_ms: DEFAULT_ACTIVE_TTL_MS,
            batch_size: 100,
            batch_delay_ms: 100,
        }
    }
}

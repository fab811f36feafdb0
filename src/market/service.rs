use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::icons;

use super::batch::chunked;
use super::{
    ActiveSymbolSet, Clock, CmcClient, FixedDelayPacer, MarketDataApi, MarketError,
    MarketSnapshot, SystemClock, TtlCache,
};

const TOP_LISTING_LIMIT: usize = 100;

/// A snapshot served to a caller, with how it was obtained. `cached` covers
/// both a fresh-enough cache hit and a stale-serve after a failed refresh.
#[derive(Debug, Clone)]
pub struct MarketHit<T> {
    pub data: T,
    pub cached: bool,
}

/// Owns the two process-lifetime market caches and the upstream client.
///
/// `api` is `None` when no credential is configured; every operation then
/// reports [`MarketError::ApiKeyNotConfigured`] instead of attempting a
/// refresh, including when stale data exists.
pub struct MarketDataService {
    api: Option<Arc<dyn MarketDataApi>>,
    clock: Arc<dyn Clock>,
    icons_dir: PathBuf,
    batch_size: usize,
    batch_delay_ms: u64,
    top100: TtlCache<MarketSnapshot>,
    active: TtlCache<Vec<String>>,
}

impl MarketDataService {
    pub fn new(
        config: &Config,
        api: Option<Arc<dyn MarketDataApi>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            clock,
            icons_dir: config.icons_dir.clone(),
            batch_size: config.batch_size,
            batch_delay_ms: config.batch_delay_ms,
            top100: TtlCache::new(config.top100_ttl_ms),
            active: TtlCache::new(config.active_ttl_ms),
        }
    }

    /// Builds the service with the real CoinMarketCap client and wall clock.
    pub fn from_config(config: &Config) -> Result<Self, MarketError> {
        let api: Option<Arc<dyn MarketDataApi>> = match &config.api_key {
            Some(key) => Some(Arc::new(CmcClient::new(key.clone())?)),
            None => None,
        };

        Ok(Self::new(config, api, Arc::new(SystemClock)))
    }

    /// Top-100 listing: cache within TTL, otherwise refresh, otherwise
    /// last-known-good.
    pub async fn top100(&self) -> Result<MarketHit<MarketSnapshot>, MarketError> {
        let now = self.clock.now_millis();

        if let Some((snapshot, _)) = self.top100.fresh(now).await {
            info!("Returning cached top-100 listing");
            return Ok(MarketHit {
                data: snapshot,
                cached: true,
            });
        }

        let api = self.api.as_ref().ok_or(MarketError::ApiKeyNotConfigured)?;

        info!("Fetching fresh top-100 listing from CoinMarketCap");

        match api.top_listings(TOP_LISTING_LIMIT).await {
            Ok(coins) => {
                let snapshot = MarketSnapshot {
                    coins,
                    timestamp: now,
                };
                self.top100.store(snapshot.clone(), now).await;
                info!("Cached {} coins from CoinMarketCap", snapshot.coins.len());

                Ok(MarketHit {
                    data: snapshot,
                    cached: false,
                })
            }
            Err(err) => {
                if let Some((snapshot, _)) = self.top100.last_known().await {
                    warn!("Top-100 refresh failed, serving stale cache: {}", err);
                    return Ok(MarketHit {
                        data: snapshot,
                        cached: true,
                    });
                }
                Err(err)
            }
        }
    }

    /// Active-listing status for every symbol in the icon catalog. Refreshes
    /// in sequential batches; a failed batch is skipped, so the set may be
    /// partial.
    pub async fn active_coins(&self) -> Result<MarketHit<ActiveSymbolSet>, MarketError> {
        let now = self.clock.now_millis();

        if let Some((symbols, fetched_at)) = self.active.fresh(now).await {
            info!("Returning cached active-coin set");
            return Ok(MarketHit {
                data: cached_set(symbols, fetched_at),
                cached: true,
            });
        }

        let api = self.api.as_ref().ok_or(MarketError::ApiKeyNotConfigured)?;

        match self.refresh_active(api.as_ref(), now).await {
            Ok(set) => {
                self.active.store(set.active_symbols.clone(), now).await;
                info!(
                    "Found {} active coins out of {} ({} API calls)",
                    set.active_symbols.len(),
                    set.total_checked,
                    set.api_calls_made
                );

                Ok(MarketHit {
                    data: set,
                    cached: false,
                })
            }
            Err(err) => {
                if let Some((symbols, fetched_at)) = self.active.last_known().await {
                    warn!("Active-coin refresh failed, serving stale cache: {}", err);
                    return Ok(MarketHit {
                        data: cached_set(symbols, fetched_at),
                        cached: true,
                    });
                }
                Err(err)
            }
        }
    }

    async fn refresh_active(
        &self,
        api: &dyn MarketDataApi,
        now: i64,
    ) -> Result<ActiveSymbolSet, MarketError> {
        let all_symbols = icons::query_symbols(&self.icons_dir)?;
        info!("Checking listing status for {} symbols", all_symbols.len());

        let batches = chunked(&all_symbols, self.batch_size);
        let mut pacer = FixedDelayPacer::from_millis(self.batch_delay_ms);

        let mut active: BTreeSet<String> = BTreeSet::new();
        let mut api_calls_made = 0;

        for batch in &batches {
            pacer.pace().await;
            api_calls_made += 1;

            match api.active_symbols(batch).await {
                Ok(symbols) => active.extend(symbols),
                Err(MarketError::UpstreamStatus { status }) => {
                    // Partial results are acceptable; drop the batch and move on.
                    error!("CoinMarketCap error for batch: {}", status);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(ActiveSymbolSet {
            active_symbols: active.into_iter().collect(),
            timestamp: now,
            total_checked: all_symbols.len(),
            api_calls_made,
        })
    }
}

fn cached_set(symbols: Vec<String>, fetched_at: i64) -> ActiveSymbolSet {
    ActiveSymbolSet {
        total_checked: symbols.len(),
        active_symbols: symbols,
        timestamp: fetched_at,
        api_calls_made: 0,
    }
}

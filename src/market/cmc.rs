use async_trait::async_trait;
use serde::Deserialize;

use super::{Coin, MarketError};

const CMC_API_URL: &str = "https://pro-api.coinmarketcap.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upstream market-data lookups, behind a trait so the cache layer can be
/// driven by a fake in tests.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    /// Top listings by market cap, in upstream rank order.
    async fn top_listings(&self, limit: usize) -> Result<Vec<Coin>, MarketError>;

    /// Of the given tickers, the ones upstream still lists as active.
    /// Returned symbols are uppercased.
    async fn active_symbols(&self, symbols: &[String]) -> Result<Vec<String>, MarketError>;
}

/// CoinMarketCap REST client.
pub struct CmcClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    data: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    data: Vec<MapEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MapEntry {
    pub symbol: Option<String>,
    #[serde(default)]
    pub is_active: Option<i32>,
}

impl CmcClient {
    pub fn new(api_key: String) -> Result<Self, MarketError> {
        Self::with_base_url(api_key, CMC_API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, MarketError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, MarketError> {
        let response = self
            .client
            .get(url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    /// Raw map lookup, keeping the per-entry active flag. The snapshot tool
    /// needs the flag; the service only needs the symbols.
    pub async fn map_listings(
        &self,
        symbols: &[String],
    ) -> Result<Vec<MapEntry>, MarketError> {
        let url = format!(
            "{}/v1/cryptocurrency/map?symbol={}&listing_status=active",
            self.base_url,
            symbols.join(",")
        );

        let response = self.get(&url).await?;
        let body: MapResponse = response.json().await?;

        Ok(body.data)
    }
}

#[async_trait]
impl MarketDataApi for CmcClient {
    async fn top_listings(&self, limit: usize) -> Result<Vec<Coin>, MarketError> {
        let url = format!(
            "{}/v1/cryptocurrency/listings/latest?limit={}",
            self.base_url, limit
        );

        let response = self.get(&url).await?;
        let body: ListingsResponse = response.json().await?;

        Ok(body.data)
    }

    async fn active_symbols(&self, symbols: &[String]) -> Result<Vec<String>, MarketError> {
        let entries = self.map_listings(symbols).await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| entry.symbol)
            .map(|symbol| symbol.to_uppercase())
            .collect())
    }
}

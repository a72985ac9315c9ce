//! CoinGecko v3 client
//!
//! Supports the Demo (`x-cg-demo-api-key`) and Pro (`x-cg-pro-api-key`) tiers.
//! Single attempt per call, bounded by the client timeout.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MarketDataSource;
use crate::error::{MarketError, Result};
use crate::model::{CoinQuote, MarketCoin, TrendingCoin};

/// CoinGecko API tier: determines base URL and auth header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoinGeckoTier {
    /// Demo (free) API: api.coingecko.com/api/v3
    #[default]
    Demo,
    /// Pro (paid) API: pro-api.coingecko.com/api/v3
    Pro,
}

impl CoinGeckoTier {
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Demo => "https://api.coingecko.com/api/v3",
            Self::Pro => "https://pro-api.coingecko.com/api/v3",
        }
    }

    pub const fn api_key_header(self) -> &'static str {
        match self {
            Self::Demo => "x-cg-demo-api-key",
            Self::Pro => "x-cg-pro-api-key",
        }
    }

    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("pro") {
            Self::Pro
        } else {
            Self::Demo
        }
    }
}

/// CoinGecko client configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API key; requests go out without a key header when unset
    pub api_key: Option<String>,

    pub tier: CoinGeckoTier,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            tier: CoinGeckoTier::Demo,
            base_url: CoinGeckoTier::Demo.base_url().into(),
            timeout_secs: 10,
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Self {
        let tier = std::env::var("COINGECKO_TIER")
            .map(|t| CoinGeckoTier::from_name(&t))
            .unwrap_or_default();

        Self {
            api_key: std::env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            tier,
            base_url: std::env::var("COINGECKO_BASE_URL")
                .unwrap_or_else(|_| tier.base_url().into()),
            timeout_secs: std::env::var("COINGECKO_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),
        }
    }
}

/// CoinGecko HTTP client
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    config: CoinGeckoConfig,
}

#[derive(Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingItem>,
}

#[derive(Deserialize)]
struct TrendingItem {
    item: TrendingCoin,
}

impl CoinGeckoClient {
    /// Create a Demo-tier client
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::from_config(CoinGeckoConfig {
            api_key,
            ..Default::default()
        })
    }

    pub fn from_config(config: CoinGeckoConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketError::Config(format!("HTTP client: {e}")))?;

        if config.api_key.is_none() {
            tracing::warn!("COINGECKO_API_KEY not set - using unauthenticated requests");
        }

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(CoinGeckoConfig::from_env())
    }

    /// GET `path` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header(self.config.tier.api_key_header(), key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MarketError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Log a failed call and turn it into absence
    fn soft<T>(what: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", what, e);
                None
            }
        }
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn health_check(&self) -> bool {
        let pong = self.get_json::<serde_json::Value>("ping", &[]).await;
        Self::soft("ping", pong).is_some()
    }

    async fn get_coin_price(&self, coin_id: &str, vs_currency: &str) -> Option<CoinQuote> {
        let query = [
            ("ids", coin_id.to_string()),
            ("vs_currencies", vs_currency.to_string()),
            ("include_market_cap", "true".to_string()),
            ("include_24hr_vol", "true".to_string()),
            ("include_24hr_change", "true".to_string()),
        ];

        let result = self
            .get_json::<HashMap<String, CoinQuote>>("simple/price", &query)
            .await
            .and_then(|mut prices| {
                prices
                    .remove(coin_id)
                    .ok_or_else(|| MarketError::MissingCoin(coin_id.to_string()))
            });

        Self::soft("price data", result)
    }

    async fn get_trending_coins(&self) -> Option<Vec<TrendingCoin>> {
        let result = self
            .get_json::<TrendingResponse>("search/trending", &[])
            .await
            .map(|r| r.coins.into_iter().map(|c| c.item).collect());

        Self::soft("trending coins", result)
    }

    async fn get_market_data(&self, vs_currency: &str, per_page: u32) -> Option<Vec<MarketCoin>> {
        let query = [
            ("vs_currency", vs_currency.to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ];

        Self::soft("market data", self.get_json("coins/markets", &query).await)
    }

    async fn search_coins(&self, query: &str) -> Option<serde_json::Value> {
        let query = [("query", query.to_string())];
        Self::soft("coin search", self.get_json("search", &query).await)
    }
}

//! Market Data Integration
//!
//! Abstractions and implementations for market-data providers.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, CoinGeckoTier};
pub use mock::MockMarketData;

use async_trait::async_trait;

use crate::mentions::mentioned_coins;
use crate::model::{CoinQuote, CryptoDataBag, MarketCoin, TrendingCoin};

/// Quote currency used when the caller has no preference
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Page size of `get_market_data` when the caller has no preference
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Coins fetched for the overview when no coin was mentioned
pub const OVERVIEW_SIZE: u32 = 5;

/// Trending coins kept in a data bag
pub const TRENDING_LIMIT: usize = 3;

/// Market data source (Strategy pattern)
///
/// Every operation fails soft: an upstream failure is logged by the
/// implementation and reported as `None`, never as an error.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Source name
    fn name(&self) -> &str;

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Price, market cap, 24h volume and 24h change for one coin
    async fn get_coin_price(&self, coin_id: &str, vs_currency: &str) -> Option<CoinQuote>;

    /// Coins with recent search-interest spikes, in provider rank order
    async fn get_trending_coins(&self) -> Option<Vec<TrendingCoin>>;

    /// Top coins by descending market cap
    async fn get_market_data(&self, vs_currency: &str, per_page: u32) -> Option<Vec<MarketCoin>>;

    /// Raw search payload for a coin name or symbol
    async fn search_coins(&self, query: &str) -> Option<serde_json::Value>;

    /// Gather the market facts relevant to a free-text question.
    ///
    /// Quotes every mentioned coin; falls back to a small market overview when
    /// no quote could be gathered; always appends up to three trending coins.
    async fn get_relevant_data(&self, user_query: &str) -> CryptoDataBag {
        let mut bag = CryptoDataBag::new();

        for coin_id in mentioned_coins(user_query) {
            if let Some(quote) = self.get_coin_price(coin_id, DEFAULT_VS_CURRENCY).await {
                bag.insert_coin(coin_id, quote);
            }
        }

        if !bag.has_coins() {
            if let Some(overview) = self
                .get_market_data(DEFAULT_VS_CURRENCY, OVERVIEW_SIZE)
                .await
                .filter(|coins| !coins.is_empty())
            {
                bag.set_market_overview(overview);
            }
        }

        if let Some(mut trending) = self
            .get_trending_coins()
            .await
            .filter(|coins| !coins.is_empty())
        {
            trending.truncate(TRENDING_LIMIT);
            bag.set_trending(trending);
        }

        tracing::debug!(source = self.name(), keys = ?bag.keys(), "Assembled crypto data");
        bag
    }
}

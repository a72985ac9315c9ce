//! Mock Market Data Source
//!
//! For tests and offline demos. Returns realistic static quotes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataSource;
use crate::model::{CoinQuote, MarketCoin, TrendingCoin};

/// Mock market data with static prices
pub struct MockMarketData {
    quotes: HashMap<String, CoinQuote>,
    markets: Option<Vec<MarketCoin>>,
    trending: Option<Vec<TrendingCoin>>,
    price_calls: AtomicUsize,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

/// `market_cap_musd` is in millions of USD
fn usd_quote(price: Decimal, market_cap_musd: i64, change_24h: Decimal) -> CoinQuote {
    let market_cap = Decimal::from(market_cap_musd) * dec!(1_000_000);
    CoinQuote::new()
        .with("usd", price)
        .with("usd_market_cap", market_cap)
        .with("usd_24h_change", change_24h)
}

impl MockMarketData {
    pub fn new() -> Self {
        let quotes = [
            ("bitcoin", usd_quote(dec!(97500), 1_930_000, dec!(2.5))),
            ("ethereum", usd_quote(dec!(3450), 415_000, dec!(1.8))),
            ("cardano", usd_quote(dec!(0.95), 33_500, dec!(-1.2))),
            ("solana", usd_quote(dec!(195), 94_000, dec!(4.2))),
        ]
        .into_iter()
        .map(|(id, quote)| (id.to_string(), quote))
        .collect();

        let markets = vec![
            MarketCoin::new("bitcoin", "btc", "Bitcoin", dec!(97500)),
            MarketCoin::new("ethereum", "eth", "Ethereum", dec!(3450)),
            MarketCoin::new("tether", "usdt", "Tether", dec!(1.00)),
            MarketCoin::new("ripple", "xrp", "XRP", dec!(2.35)),
            MarketCoin::new("binancecoin", "bnb", "BNB", dec!(690)),
            MarketCoin::new("solana", "sol", "Solana", dec!(195)),
        ];

        let trending = vec![
            TrendingCoin::new("pepe", "Pepe", "PEPE"),
            TrendingCoin::new("sui", "Sui", "SUI"),
            TrendingCoin::new("bittensor", "Bittensor", "TAO"),
            TrendingCoin::new("hyperliquid", "Hyperliquid", "HYPE"),
            TrendingCoin::new("dogecoin", "Dogecoin", "DOGE"),
        ];

        Self {
            quotes,
            markets: Some(markets),
            trending: Some(trending),
            price_calls: AtomicUsize::new(0),
        }
    }

    /// Every call reports absence, as if the upstream were down
    pub fn unavailable() -> Self {
        Self {
            quotes: HashMap::new(),
            markets: None,
            trending: None,
            price_calls: AtomicUsize::new(0),
        }
    }

    /// Replace (or add) the quote for one coin
    pub fn with_quote(mut self, coin_id: impl Into<String>, quote: CoinQuote) -> Self {
        self.quotes.insert(coin_id.into(), quote);
        self
    }

    /// Drop the quote for one coin so its price lookup fails
    pub fn without_quote(mut self, coin_id: &str) -> Self {
        self.quotes.remove(coin_id);
        self
    }

    pub fn with_markets(mut self, markets: Option<Vec<MarketCoin>>) -> Self {
        self.markets = markets;
        self
    }

    pub fn with_trending(mut self, trending: Option<Vec<TrendingCoin>>) -> Self {
        self.trending = trending;
        self
    }

    /// Number of price lookups served so far
    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    fn name(&self) -> &str {
        "MockMarket"
    }

    async fn health_check(&self) -> bool {
        self.markets.is_some()
    }

    async fn get_coin_price(&self, coin_id: &str, _vs_currency: &str) -> Option<CoinQuote> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.quotes.get(coin_id).cloned()
    }

    async fn get_trending_coins(&self) -> Option<Vec<TrendingCoin>> {
        self.trending.clone()
    }

    async fn get_market_data(&self, _vs_currency: &str, per_page: u32) -> Option<Vec<MarketCoin>> {
        self.markets
            .as_ref()
            .map(|m| m.iter().take(per_page as usize).cloned().collect())
    }

    async fn search_coins(&self, query: &str) -> Option<serde_json::Value> {
        let query = query.to_lowercase();
        let markets = self.markets.as_ref()?;
        let coins: Vec<serde_json::Value> = markets
            .iter()
            .filter(|c| {
                c.id.contains(&query)
                    || c.symbol == query
                    || c.name.to_lowercase().contains(&query)
            })
            .map(|c| serde_json::json!({"id": c.id, "name": c.name, "symbol": c.symbol}))
            .collect();
        Some(serde_json::json!({ "coins": coins }))
    }
}

//! Domain Models
//!
//! Market facts gathered for a single chat request.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bag key under which the market overview is stored
pub const MARKET_OVERVIEW_KEY: &str = "market_overview";

/// Bag key under which trending coins are stored
pub const TRENDING_KEY: &str = "trending";

/// Price quote for one coin as returned by `simple/price`
///
/// Fields are keyed by vs-currency: `usd`, `usd_market_cap`, `usd_24h_vol`,
/// `usd_24h_change`, plus `last_updated_at` when requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinQuote(BTreeMap<String, Option<Decimal>>);

impl CoinQuote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw field (builder style)
    pub fn with(mut self, field: impl Into<String>, value: Decimal) -> Self {
        self.0.insert(field.into(), Some(value));
        self
    }

    fn field(&self, key: &str) -> Option<Decimal> {
        self.0.get(key).copied().flatten()
    }

    /// Current price in `vs_currency`
    pub fn price(&self, vs_currency: &str) -> Option<Decimal> {
        self.field(vs_currency)
    }

    pub fn market_cap(&self, vs_currency: &str) -> Option<Decimal> {
        self.field(&format!("{vs_currency}_market_cap"))
    }

    pub fn volume_24h(&self, vs_currency: &str) -> Option<Decimal> {
        self.field(&format!("{vs_currency}_24h_vol"))
    }

    /// 24-hour price change percentage
    pub fn change_24h(&self, vs_currency: &str) -> Option<Decimal> {
        self.field(&format!("{vs_currency}_24h_change"))
    }
}

/// A row of `coins/markets`, ranked by market cap
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<Decimal>,
    pub price_change_percentage_24h: Option<Decimal>,
}

impl MarketCoin {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price: Some(current_price),
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            price_change_percentage_24h: None,
        }
    }
}

/// Summary of a coin from `search/trending`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub price_btc: Option<Decimal>,
    pub score: Option<u32>,
}

impl TrendingCoin {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_rank: None,
            price_btc: None,
            score: None,
        }
    }
}

/// Market facts assembled for one request
///
/// Keyed by canonical coin id, or by [`MARKET_OVERVIEW_KEY`] / [`TRENDING_KEY`].
/// Iteration order is coins (in insertion order), then overview, then trending.
#[derive(Clone, Debug, Default)]
pub struct CryptoDataBag {
    coins: Vec<(String, CoinQuote)>,
    market_overview: Option<Vec<MarketCoin>>,
    trending: Option<Vec<TrendingCoin>>,
}

impl CryptoDataBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the quote for `coin_id`
    pub fn insert_coin(&mut self, coin_id: impl Into<String>, quote: CoinQuote) {
        let coin_id = coin_id.into();
        match self.coins.iter_mut().find(|(id, _)| *id == coin_id) {
            Some((_, existing)) => *existing = quote,
            None => self.coins.push((coin_id, quote)),
        }
    }

    pub fn set_market_overview(&mut self, coins: Vec<MarketCoin>) {
        self.market_overview = Some(coins);
    }

    pub fn set_trending(&mut self, coins: Vec<TrendingCoin>) {
        self.trending = Some(coins);
    }

    pub fn coin(&self, coin_id: &str) -> Option<&CoinQuote> {
        self.coins
            .iter()
            .find(|(id, _)| id == coin_id)
            .map(|(_, q)| q)
    }

    /// Coin quotes in insertion order
    pub fn coins(&self) -> impl Iterator<Item = (&str, &CoinQuote)> {
        self.coins.iter().map(|(id, q)| (id.as_str(), q))
    }

    pub fn market_overview(&self) -> Option<&[MarketCoin]> {
        self.market_overview.as_deref()
    }

    pub fn trending(&self) -> Option<&[TrendingCoin]> {
        self.trending.as_deref()
    }

    /// All keys present, in iteration order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.coins.iter().map(|(id, _)| id.as_str()).collect();
        if self.market_overview.is_some() {
            keys.push(MARKET_OVERVIEW_KEY);
        }
        if self.trending.is_some() {
            keys.push(TRENDING_KEY);
        }
        keys
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            MARKET_OVERVIEW_KEY => self.market_overview.is_some(),
            TRENDING_KEY => self.trending.is_some(),
            coin_id => self.coin(coin_id).is_some(),
        }
    }

    pub fn has_coins(&self) -> bool {
        !self.coins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty() && self.market_overview.is_none() && self.trending.is_none()
    }
}

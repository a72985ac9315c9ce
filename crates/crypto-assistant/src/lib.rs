//! # crypto-assistant
//!
//! Answers chat questions about cryptocurrency by pairing live market data
//! with a language model.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  "What is the price of ETH?"                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │  mentions     eth → ethereum                                 │
//! │  market       simple/price ethereum, search/trending         │
//! │  context      "Ethereum: $2500.12 (+1.50%) | Trending: ..."  │
//! │  assistant    expert prompt → LlmProvider → reply text       │
//! └──────────────────────────────────────────────────────────────┘
//!
//! No coin mentioned → top-5 market overview instead of quotes.
//! Not a crypto question at all → educator prompt, no market calls.
//! ```

pub mod assistant;
pub mod context;
pub mod error;
pub mod market;
pub mod mentions;
pub mod model;
pub mod prompt;

pub use assistant::CryptoAssistant;
pub use context::format_crypto_context;
pub use error::{MarketError, Result};
pub use market::{CoinGeckoClient, CoinGeckoConfig, MarketDataSource, MockMarketData};
pub use mentions::{is_crypto_query, mentioned_coins};
pub use model::{CoinQuote, CryptoDataBag, MarketCoin, TrendingCoin};

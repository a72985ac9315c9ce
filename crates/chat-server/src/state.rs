//! Application State

use std::sync::Arc;

use crypto_assistant::{CryptoAssistant, MarketDataSource};

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    /// Market data source (CoinGecko in production)
    pub market: Arc<dyn MarketDataSource>,

    /// Language-model client for both answer paths
    pub assistant: Arc<CryptoAssistant>,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketDataSource>, assistant: CryptoAssistant) -> Self {
        Self {
            market,
            assistant: Arc::new(assistant),
        }
    }
}

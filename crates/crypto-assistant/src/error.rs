//! Error Types for the Market Data Client
//!
//! These never reach HTTP callers: every public market operation logs the
//! error and reports absence instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No data returned for {0}")]
    MissingCoin(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

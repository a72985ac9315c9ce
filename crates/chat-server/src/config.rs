//! Server Configuration
//!
//! Provider settings live with their clients (`GeminiConfig`,
//! `CoinGeckoConfig`); this covers the HTTP layer only.

use std::path::PathBuf;

const DEFAULT_SECRET_KEY: &str = "your_default_secret";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Directory holding the chat page
    pub static_dir: PathBuf,

    /// Process secret reserved for session signing
    pub secret_key: String,

    /// Read for parity with deployments that set it; no code path uses it
    pub openai_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            static_dir: PathBuf::from("static"),
            secret_key: DEFAULT_SECRET_KEY.into(),
            openai_api_key: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            secret_key: std::env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.uses_default_secret());
        assert!(config.openai_api_key.is_none());
    }
}

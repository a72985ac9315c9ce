//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors raised while talking to a language model
#[derive(Error, Debug)]
pub enum ChatError {
    /// Provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Whether the error comes from the caller's setup rather than the upstream service
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = ChatError::Config("Gemini API key is required".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: Gemini API key is required"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(ChatError::Auth("bad key".into()).is_configuration());
        let throttled = ChatError::RateLimited("slow down".into());
        assert!(!throttled.is_configuration());
    }
}

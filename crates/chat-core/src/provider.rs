//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for language model backends so the assistant
//! can run against Gemini in production and a scripted double in tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = GeminiProvider::from_env()?;
//! let reply = provider.prompt("Say hello", &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-1.5-flash")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_top_p() -> f32 {
    0.9
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: Vec::new(),
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Check if the provider is reachable and the credentials are accepted
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;

    /// Single-turn convenience: send `text` as one user message, return the reply text
    async fn prompt(&self, text: &str, options: &GenerationOptions) -> Result<String> {
        let completion = self.complete(&[Message::user(text)], options).await?;
        Ok(completion.content)
    }
}

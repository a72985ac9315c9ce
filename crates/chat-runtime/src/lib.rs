//! # chat-runtime
//!
//! Runtime providers for the crypto chat backend.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Generative Language REST API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_runtime::GeminiProvider;
//!
//! let provider = Arc::new(GeminiProvider::from_env()?);
//! let assistant = CryptoAssistant::new(provider);
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use chat_core::{ChatError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};

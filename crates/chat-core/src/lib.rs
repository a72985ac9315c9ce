//! # chat-core
//!
//! Provider-agnostic LLM abstraction used by the crypto chat backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────────┐
//! │  CryptoAssistant     │─────▶│  LlmProvider (Strategy)  │
//! │  (prompt templates)  │      │  Gemini, test doubles... │
//! └──────────────────────┘      └──────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the assistant talk to Gemini or any other
//! backend without changing the prompt logic.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{ChatError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};

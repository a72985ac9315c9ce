//! crypto-chat HTTP server
//!
//! Axum application serving the chat page, the chat endpoint and a health check.

pub mod config;
pub mod handlers;
pub mod state;

mod router;

pub use config::ServerConfig;
pub use router::router;
pub use state::AppState;

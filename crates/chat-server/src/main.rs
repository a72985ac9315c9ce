//! crypto-chat HTTP Server
//!
//! Answers cryptocurrency questions by combining CoinGecko market data with
//! Gemini completions.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_core::LlmProvider;
use chat_runtime::GeminiProvider;
use chat_server::{AppState, ServerConfig, router};
use crypto_assistant::{CoinGeckoClient, CryptoAssistant, MarketDataSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    if config.uses_default_secret() {
        tracing::warn!("⚠ SECRET_KEY not set - using the built-in default");
    }
    if config.openai_api_key.is_some() {
        tracing::debug!("OPENAI_API_KEY is set but not used");
    }

    // Initialize LLM provider (fatal without an API key)
    let provider = Arc::new(GeminiProvider::from_env()?);

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Gemini"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Gemini not reachable - chat replies will carry the error");
        }
    }

    // Initialize market data client
    let market = Arc::new(CoinGeckoClient::from_env()?);

    if market.health_check().await {
        tracing::info!("✓ Connected to CoinGecko");
    } else {
        tracing::warn!("⚠ CoinGecko not reachable - answers will lack live prices");
    }

    // Build application state
    let assistant = CryptoAssistant::with_options(provider.clone(), provider.default_options());
    let state = AppState::new(market, assistant);

    let app = router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!(
        "🚀 crypto-chat server running on http://{}",
        config.bind_addr
    );
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!(
        "  GET  /        - Chat page ({})",
        config.static_dir.display()
    );
    tracing::info!("  POST /chat    - Send message");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

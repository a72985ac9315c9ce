//! Connectivity check for the two upstream APIs.
//!
//! Uses the same environment as the server. Exits non-zero if either API fails.

use tracing_subscriber::EnvFilter;

use chat_core::LlmProvider;
use chat_runtime::GeminiProvider;
use crypto_assistant::{CoinGeckoClient, MarketDataSource};

async fn check_gemini() -> bool {
    tracing::info!("🔵 Testing Gemini API...");

    let provider = match GeminiProvider::from_env() {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("❌ Gemini failed: {}", e);
            return false;
        }
    };

    let options = provider.default_options();
    match provider.prompt("Say hello", &options).await {
        Ok(reply) => {
            tracing::info!("✅ Gemini works: {}", reply.trim());
            true
        }
        Err(e) => {
            tracing::error!("❌ Gemini failed: {}", e);
            if e.is_configuration() {
                tracing::error!("   Check GEMINI_API_KEY and GEMINI_MODEL");
            }
            false
        }
    }
}

async fn check_coingecko() -> anyhow::Result<bool> {
    tracing::info!("🔵 Testing CoinGecko API...");

    let market = CoinGeckoClient::from_env()?;
    let Some(quote) = market.get_coin_price("bitcoin", "usd").await else {
        tracing::error!("❌ CoinGecko failed (see warning above)");
        return Ok(false);
    };

    match quote.price("usd") {
        Some(price) => tracing::info!("✅ CoinGecko works: bitcoin = ${}", price),
        None => tracing::info!("✅ CoinGecko works: {:?}", quote),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let results = [check_gemini().await, check_coingecko().await?];
    let failures = results.iter().filter(|ok| !**ok).count();

    if failures > 0 {
        anyhow::bail!("{failures} API check(s) failed");
    }

    Ok(())
}

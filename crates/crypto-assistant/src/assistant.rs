//! Crypto Assistant
//!
//! Language-model client for the chat endpoint. Both answer paths always
//! produce text: a provider failure becomes an apology carrying the error.

use std::sync::Arc;

use chat_core::{ChatError, GenerationOptions, LlmProvider};

use crate::context::format_crypto_context;
use crate::model::CryptoDataBag;
use crate::prompt::{crypto_prompt, general_prompt};

/// Reply text used when the model call fails
pub fn apology(err: &ChatError) -> String {
    format!("Sorry, I encountered an error: {err}")
}

/// Prompts the model as a crypto expert (with market data) or educator (without)
#[derive(Clone)]
pub struct CryptoAssistant {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl CryptoAssistant {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_options(provider, GenerationOptions::default())
    }

    pub fn with_options(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Answer `user_message` using the market facts in `crypto_data`
    pub async fn get_crypto_response(
        &self,
        user_message: &str,
        crypto_data: &CryptoDataBag,
    ) -> String {
        let context = format_crypto_context(crypto_data);
        tracing::info!("Crypto context: {}", context);

        self.answer(crypto_prompt(&context, user_message), "crypto")
            .await
    }

    /// Answer `user_message` from general knowledge only
    pub async fn get_general_crypto_response(&self, user_message: &str) -> String {
        self.answer(general_prompt(user_message), "general").await
    }

    async fn answer(&self, prompt: String, path: &'static str) -> String {
        tracing::debug!(path, provider = self.provider.name(), "Sending prompt");

        match self.provider.prompt(&prompt, &self.options).await {
            Ok(reply) => {
                tracing::info!(path, chars = reply.len(), "Model response received");
                reply
            }
            Err(e) => {
                tracing::error!("Model {} response error: {}", path, e);
                apology(&e)
            }
        }
    }
}

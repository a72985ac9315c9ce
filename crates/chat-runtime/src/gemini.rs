//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Google Generative Language REST API
//! (`models/{model}:generateContent`).

use std::time::Duration;

use async_trait::async_trait;
use chat_core::{
    error::{ChatError, Result},
    message::{Message, Role},
    provider::{
        Completion, DEFAULT_MODEL, FinishReason, GenerationOptions, LlmProvider, TokenUsage,
    },
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key (required)
    pub api_key: String,

    /// Model used when the caller does not pick one
    pub model: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a provider for the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(GeminiConfig {
            api_key: api_key.into(),
            ..Default::default()
        })
    }

    /// Create from configuration. Fails when no API key is supplied.
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ChatError::Config("Gemini API key is required".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("HTTP client: {e}")))?;

        let key_prefix: String = config.api_key.chars().take(6).collect();
        tracing::info!(model = %config.model, "Gemini configured with API key {key_prefix}...");

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(GeminiConfig::from_env())
    }

    /// Generation options targeting the configured model
    pub fn default_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.config.model.clone(),
            ..Default::default()
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Convert messages to Gemini `contents`, lifting system turns into `systemInstruction`
    fn build_request(messages: &[Message], options: &GenerationOptions) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role {
                Role::System => system_parts.push(part),
                Role::User => contents.push(Content {
                    role: Some("user".into()),
                    parts: vec![part],
                }),
                Role::Assistant => contents.push(Content {
                    role: Some("model".into()),
                    parts: vec![part],
                }),
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction: (!system_parts.is_empty()).then(|| Content {
                role: None,
                parts: system_parts,
            }),
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                top_p: options.top_p,
                stop_sequences: options.stop_sequences.clone(),
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn convert_completion(response: GenerateContentResponse, model: &str) -> Result<Completion> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ChatError::Provider(format!("prompt blocked: {reason}")));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Provider("response contained no candidates".into()))?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ChatError::Provider(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(Completion {
            content,
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: candidate.finish_reason.as_deref().map(map_finish_reason),
        })
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Other,
    }
}

fn map_status_error(status: StatusCode, body: String) -> ChatError {
    match status.as_u16() {
        401 | 403 => ChatError::Auth(body),
        400 if body.contains("API_KEY_INVALID") => ChatError::Auth(body),
        429 => ChatError::RateLimited(body),
        _ => ChatError::Provider(format!("HTTP {status}: {body}")),
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .http
            .get(self.model_url(&self.config.model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await;

        match response {
            Ok(r) => Ok(r.status().is_success()),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);
        let url = format!("{}:generateContent", self.model_url(&options.model));

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(map_status_error(status, body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        Self::convert_completion(parsed, &options.model)
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    type SeenRequests = Arc<Mutex<Vec<String>>>;

    /// Local HTTP server answering every request with `status` and `body`.
    /// Returns its base URL and the full requests it received.
    async fn canned_server(status: u16, body: &'static str) -> (String, SeenRequests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let seen = SeenRequests::default();
        let log = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (base_url, seen)
    }

    /// Read one request, head and `content-length` body
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length: usize = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return String::from_utf8_lossy(&buf).into_owned();
                }
            }

            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return String::from_utf8_lossy(&buf).into_owned();
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn provider_for(base_url: &str) -> GeminiProvider {
        GeminiProvider::from_config(GeminiConfig {
            api_key: "test-key".into(),
            base_url: base_url.into(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = GeminiProvider::new("   ").unwrap_err();
        assert!(
            matches!(err, ChatError::Config(ref m) if m == "Gemini API key is required")
        );
    }

    #[test]
    fn test_default_options_follow_configured_model() {
        let provider = GeminiProvider::from_config(GeminiConfig {
            api_key: "test-key".into(),
            model: "gemini-1.5-pro".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.default_options().model, "gemini-1.5-pro");
    }

    #[test]
    fn test_request_lifts_system_turns() {
        let messages = vec![
            Message::system("You are terse."),
            Message::user("Hello"),
            Message::assistant("Hi"),
            Message::user("Price of BTC?"),
        ];
        let request = GeminiProvider::build_request(&messages, &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are terse."
        );
        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert!(json["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_single_user_turn_has_no_system_instruction() {
        let request = GeminiProvider::build_request(
            &[Message::user("Say hello")],
            &GenerationOptions::default(),
        );
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_completion_joins_candidate_parts() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Bitcoin is "}, {"text": "volatile."}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16}
            }"#,
        );
        let completion =
            GeminiProvider::convert_completion(response, "gemini-1.5-flash").unwrap();
        assert_eq!(completion.content, "Bitcoin is volatile.");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn test_blocked_prompt_is_an_error() {
        let json = r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = GeminiProvider::convert_completion(parse(json), "m").unwrap_err();
        assert_eq!(err.to_string(), "Provider error: prompt blocked: SAFETY");
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let err = GeminiProvider::convert_completion(parse("{}"), "m").unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN, String::new()),
            ChatError::Auth(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::BAD_REQUEST, "reason: API_KEY_INVALID".into()),
            ChatError::Auth(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ChatError::RateLimited(_)
        ));
        let other = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert_eq!(
            other.to_string(),
            "Provider error: HTTP 500 Internal Server Error: boom"
        );
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_parse_error() {
        let (base_url, _) = canned_server(200, "<html>not json</html>").await;
        let provider = provider_for(&base_url);

        let err = provider
            .prompt("Say hello", &provider.default_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Parse(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_mapped() {
        let (base_url, _) =
            canned_server(429, r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#).await;
        let provider = provider_for(&base_url);

        let err = provider
            .prompt("Say hello", &provider.default_options())
            .await
            .unwrap_err();
        assert!(
            matches!(err, ChatError::RateLimited(ref body) if body.contains("RESOURCE_EXHAUSTED"))
        );
    }

    #[tokio::test]
    async fn test_generate_content_round_trip() {
        let (base_url, seen) = canned_server(
            200,
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "Hello!"}]}, "finishReason": "STOP"}]}"#,
        )
        .await;
        let provider = provider_for(&base_url);

        let reply = provider
            .prompt("Say hello", &provider.default_options())
            .await
            .unwrap();
        assert_eq!(reply, "Hello!");

        let request = seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(
            request.lines().next(),
            Some("POST /models/gemini-1.5-flash:generateContent HTTP/1.1")
        );
        assert!(request.contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""text":"Say hello""#));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_unavailable() {
        let provider = provider_for("http://127.0.0.1:9");

        let err = provider
            .prompt("Say hello", &provider.default_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ProviderUnavailable(_)));
        assert!(!provider.health_check().await.unwrap());
    }
}

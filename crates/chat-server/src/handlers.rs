//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crypto_assistant::is_crypto_query;

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    let error = error.into();
    (status, Json(ErrorResponse { error }))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

/// Chat endpoint: market-aware answer for crypto questions, general answer otherwise
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Raw rejection text goes back to the client
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Rejected chat body: {}", rejection);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text())
    })?;

    let message = payload
        .message
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No message provided"));
    }

    let span = tracing::info_span!("chat", request_id = %uuid::Uuid::new_v4());

    let response = async {
        if is_crypto_query(message) {
            tracing::info!("Routing to crypto path");
            let crypto_data = state.market.get_relevant_data(message).await;
            state
                .assistant
                .get_crypto_response(message, &crypto_data)
                .await
        } else {
            tracing::info!("Routing to general path");
            state.assistant.get_general_crypto_response(message).await
        }
    }
    .instrument(span)
    .await;

    Ok(Json(ChatResponse {
        response,
        timestamp: Utc::now(),
    }))
}

//! Router assembly

use std::any::Any;
use std::path::Path;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as CorsAny, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{api_error, chat_handler, health_check};
use crate::state::AppState;

/// Build the application router; `static_dir` backs `GET /`
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(CorsAny)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny);

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(cors),
        )
        .with_state(state)
}

/// Turn a handler panic into the JSON 500 body
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "Unknown error".into());

    tracing::error!("Request handler panicked: {}", detail);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
}

//! Chat relay.
//!
//! Answers time and date questions through a completion API and forwards every
//! other message to the local inference backend, wrapping both in the same
//! response envelope.

use std::any::Any;

use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{Response, StatusCode, header},
    routing::post,
};
use config::RelayConfig;
use tower_http::catch_panic::CatchPanicLayer;

mod backend;
mod clock;
mod completion;
mod error;
mod intent;
mod messages;
mod server;

pub use error::RelayError;
use error::{ErrorResponse, GENERIC_ERROR_MESSAGE};
use messages::{ChatRequest, ChatResponse};
use server::RelayServer;

pub(crate) type Result<T> = std::result::Result<T, RelayError>;

/// Creates an axum router for the chat endpoint.
pub fn router(config: &RelayConfig) -> anyhow::Result<Router> {
    let server = RelayServer::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize chat relay: {e}"))?;

    let router = Router::new()
        .route(&config.path, post(chat))
        .with_state(server)
        .layer(CatchPanicLayer::custom(handle_panic));

    Ok(router)
}

/// Handle chat requests.
///
/// Time questions are answered by the completion API, everything else by the
/// inference backend. Any failure becomes a 500 with an `error` message.
async fn chat(
    State(server): State<RelayServer>,
    request: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = request.map_err(|rejection| RelayError::InvalidRequest(rejection.body_text()))?;

    log::debug!(
        "Chat request with {} messages, latest role: {:?}",
        request.messages.len(),
        request.last_role()
    );

    let response = server.chat(&request).await?;

    Ok(Json(response))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    log::error!("Chat handler panicked: {details}");

    let body = ErrorResponse {
        error: GENERIC_ERROR_MESSAGE.to_string(),
    };

    let body = sonic_rs::to_string(&body).unwrap_or_else(|_| format!(r#"{{"error":"{GENERIC_ERROR_MESSAGE}"}}"#));

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_default()
}

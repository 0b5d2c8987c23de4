use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message used when a failure carries no text of its own.
pub(crate) const GENERIC_ERROR_MESSAGE: &str = "API call failed";

/// Relay errors. Every one of them ends the request with a 500.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request body could not be read as a chat request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The inference backend answered with a non-success status.
    #[error("Inference backend error: {reason}")]
    BackendStatus { status: u16, reason: String },

    /// The inference backend could not be reached.
    #[error("Connection error: {0}")]
    BackendConnection(String),

    /// The inference backend answered with a body we could not use.
    #[error("Invalid response from inference backend: {0}")]
    BackendResponse(String),

    /// Internal relay error.
    /// If Some(message), the message is shown to the client.
    /// If None, the generic message is used instead.
    #[error("{}", .0.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Internal(Option<String>),
}

impl RelayError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn message(&self) -> String {
        let message = self.to_string();

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Error body returned to the client.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::BackendStatus { status: backend_status, .. } => {
                log::error!("Backend error ({backend_status}): {self}");
            }
            _ => log::error!("Relay error ({}): {self}", status.as_u16()),
        }

        let body = ErrorResponse { error: self.message() };

        (status, Json(body)).into_response()
    }
}

//! Static file and proxy gateway.
//!
//! Serves a public directory and forwards everything under the proxy prefix
//! to the inference backend with the prefix removed.

#![deny(missing_docs)]

mod headers;
mod proxy;

use std::{any::Any, sync::Arc};

use axum::{Router, body::Body, routing::any};
use config::GatewayConfig;
use http::{Response, StatusCode, header};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

pub use proxy::ProxyError;
use proxy::ProxyState;

const UNHANDLED_ERROR_MESSAGE: &str = "Something broke!";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Creates an axum router serving static files and proxying the configured prefix.
pub fn router(config: &GatewayConfig) -> anyhow::Result<Router> {
    let state = Arc::new(ProxyState::new(&config.proxy)?);
    let prefix = config.proxy.prefix.as_ref();

    log::debug!(
        "Serving static files from {} and proxying {prefix} to {}",
        config.public_dir.display(),
        config.proxy.target
    );

    let router = Router::new()
        .route(prefix, any(proxy::proxy))
        .route(&format!("{prefix}/"), any(proxy::proxy))
        .route(&format!("{prefix}/{{*path}}"), any(proxy::proxy))
        .with_state(state)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(CatchPanicLayer::custom(handle_panic));

    Ok(router)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    log::error!("Unhandled error while routing: {details}");

    let body = ErrorResponse {
        error: UNHANDLED_ERROR_MESSAGE.to_string(),
    };

    let body = sonic_rs::to_string(&body).unwrap_or_else(|_| format!(r#"{{"error":"{UNHANDLED_ERROR_MESSAGE}"}}"#));

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_default()
}

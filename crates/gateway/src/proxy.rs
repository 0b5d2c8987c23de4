use std::sync::Arc;

use axum::{
    Json,
    body::{Body, HttpBody},
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use config::ProxyConfig;
use http::StatusCode;
use reqwest::Client;
use thiserror::Error;

use crate::{ErrorResponse, headers};

const PROXY_ERROR_MESSAGE: &str = "Proxy error occurred";

/// Failures between the gateway and the proxied backend.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The backend could not be reached, the connection failed, or the client
    /// body broke off while being streamed to the backend.
    #[error("Failed to reach proxy target: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        log::error!("Proxy error: {self}");

        let body = ErrorResponse {
            error: PROXY_ERROR_MESSAGE.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub(crate) struct ProxyState {
    client: Client,
    target: String,
    prefix: String,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client for the proxy: {e}"))?;

        Ok(Self {
            client,
            target: config.target.as_str().trim_end_matches('/').to_string(),
            prefix: config.prefix.to_string(),
        })
    }

    async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let path_and_query = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let url = format!("{}{}", self.target, rewrite_path(path_and_query, &self.prefix));

        log::debug!("Proxying {} {path_and_query} to {url}", parts.method);

        let body = outgoing_body(body);

        let request_builder = self.client.request(parts.method, url);
        let response = headers::apply_request_headers(&parts.headers, request_builder)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let response_headers = headers::preserve_response_headers(response.headers());

        let mut proxied = Response::new(Body::from_stream(response.bytes_stream()));
        *proxied.status_mut() = status;
        *proxied.headers_mut() = response_headers;

        Ok(proxied)
    }
}

/// Streams the client body to the backend as it arrives. A body known to be
/// empty stays empty, so bodiless requests are not sent chunked.
fn outgoing_body(body: Body) -> reqwest::Body {
    if body.size_hint().exact() == Some(0) {
        reqwest::Body::from(Vec::new())
    } else {
        reqwest::Body::wrap_stream(body.into_data_stream())
    }
}

/// Forwards any request under the prefix to the backend and relays its answer unchanged.
pub(crate) async fn proxy(State(state): State<Arc<ProxyState>>, request: Request) -> Result<Response, ProxyError> {
    state.forward(request).await
}

/// Strips the prefix from a path and query: `/api/foo?x=1` becomes `/foo?x=1`, `/api` becomes `/`.
pub(crate) fn rewrite_path(path_and_query: &str, prefix: &str) -> String {
    let rest = path_and_query.strip_prefix(prefix).unwrap_or(path_and_query);

    if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    }
}

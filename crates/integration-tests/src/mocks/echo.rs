use std::{collections::BTreeMap, net::SocketAddr};

use axum::{
    Json, Router,
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// A backend that answers every request with a description of what it received.
///
/// `/status/<code>` answers with that status code and a plain text body instead.
pub struct EchoBackend {
    pub address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

/// What the echo backend saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl EchoBackend {
    pub async fn spawn() -> anyhow::Result<Self> {
        let app = Router::new().fallback(echo);
        let (address, _handle) = super::spawn_router(app).await?;

        Ok(Self { address, _handle })
    }

    /// The value for `gateway.proxy.target`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }
}

async fn echo(request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    if let Some(code) = path.strip_prefix("/status/") {
        let status = code
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);

        return (status, format!("backend answered {}", status.as_u16())).into_response();
    }

    let body: Bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();

    let echoed = EchoedRequest {
        method: parts.method.to_string(),
        path,
        query: parts.uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let mut response = Json(echoed).into_response();
    response
        .headers_mut()
        .insert("x-echo-backend", HeaderValue::from_static("yes"));

    response
}

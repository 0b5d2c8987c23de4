use config::BackendConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Body sent to the inference backend. `message` is left out when there is none.
#[derive(Debug, Serialize)]
struct BackendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BackendResponse {
    response: String,
}

/// Forwards messages the relay does not answer itself to the local inference backend.
pub(crate) struct BackendClient {
    client: Client,
    url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> crate::Result<Self> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            log::error!("Failed to create HTTP client for the inference backend: {e}");
            RelayError::Internal(None)
        })?;

        Ok(Self {
            client,
            url: config.url.to_string(),
        })
    }

    /// Sends the message unchanged and returns the backend's `response` field verbatim.
    pub async fn forward(&self, message: Option<&str>) -> crate::Result<String> {
        log::debug!("Forwarding message to inference backend at {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&BackendRequest { message })
            .send()
            .await
            .map_err(|e| RelayError::BackendConnection(format!("Failed to reach inference backend: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            return Err(RelayError::BackendStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or(status.as_str()).to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RelayError::BackendResponse(format!("failed to read body: {e}")))?;

        let BackendResponse { response } =
            sonic_rs::from_str(&body).map_err(|e| RelayError::BackendResponse(e.to_string()))?;

        Ok(response)
    }
}

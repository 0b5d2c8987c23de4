mod input;
mod output;

use config::CompletionConfig;
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use self::{input::CompletionRequest, output::CompletionResponse};
use crate::error::RelayError;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Failures talking to the completion API.
#[derive(Debug, Error)]
pub(crate) enum CompletionError {
    /// Network or connection error.
    #[error("Failed to send request to the completion API: {0}")]
    Connection(String),

    /// The API answered with a non-success status.
    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with a body that is not a completion response.
    #[error("Invalid completion API response: {0}")]
    InvalidResponse(String),
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub(crate) struct CompletionClient {
    client: Client,
    url: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig) -> crate::Result<Self> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            log::error!("Failed to create HTTP client for the completion API: {e}");
            RelayError::Internal(None)
        })?;

        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_API_URL);

        if config.api_key.is_none() {
            log::warn!("No completion API key configured, time queries will be answered with the fallback message");
        }

        Ok(Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Sends the prompt as a single user turn and returns the text of the first choice.
    ///
    /// `Ok(None)` means the API answered, but without any usable text.
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError> {
        let request = CompletionRequest::single_turn(&self.model, self.temperature, prompt);

        log::debug!("Sending completion request to {} with model {}", self.url, self.model);

        let mut request_builder = self.client.post(&self.url);

        if let Some(ref key) = self.api_key {
            request_builder = request_builder.header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()));
        }

        let response = request_builder
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("failed to read body: {e}")))?;

        parse_response(&response_text)
    }
}

fn parse_response(response_text: &str) -> Result<Option<String>, CompletionError> {
    let response: CompletionResponse = sonic_rs::from_str(response_text).map_err(|e| {
        log::debug!("Raw completion response that failed to parse: {response_text}");
        CompletionError::InvalidResponse(e.to_string())
    })?;

    Ok(response.into_text())
}

//! Chat relay configuration.

use std::{
    borrow::Cow,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

use duration_str::deserialize_option_duration;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::HealthConfig;

const DEFAULT_FALLBACK_MESSAGE: &str = "I'm sorry, I had trouble fetching the time. Please try again.";

/// Chat relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// The socket address the relay listens on.
    pub listen_address: SocketAddr,
    /// The path where the chat endpoint is mounted.
    pub path: Cow<'static, str>,
    /// Health endpoint configuration.
    pub health: HealthConfig,
    /// Cross-origin request settings.
    pub cors: CorsConfig,
    /// Time query detection settings.
    pub intent: IntentConfig,
    /// Completion API used to answer time queries.
    pub completion: CompletionConfig,
    /// Inference backend receiving every other message.
    pub backend: BackendConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3001)),
            path: Cow::Borrowed("/api/chat"),
            health: HealthConfig::default(),
            cors: CorsConfig::default(),
            intent: IntentConfig::default(),
            completion: CompletionConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

/// CORS configuration for the relay.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Whether any origin may call the relay.
    pub enabled: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Keywords marking a message as a time or date question.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntentConfig {
    /// Whole words matched case-insensitively against the latest message.
    pub keywords: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["time".to_string(), "date".to_string(), "clock".to_string()],
        }
    }
}

/// Configuration for the OpenAI-compatible completion API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionConfig {
    /// Custom base URL for the API. Defaults to the public OpenAI endpoint.
    pub base_url: Option<String>,
    /// API key sent as a bearer token. Not validated, a missing key fails downstream.
    pub api_key: Option<SecretString>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Reply used when the API call fails.
    pub fallback_message: String,
    /// Request timeout. No timeout when unset.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            timeout: None,
        }
    }
}

/// The local inference backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Full URL of the backend chat endpoint.
    pub url: Url,
    /// Request timeout. No timeout when unset.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:5005/chat").expect("default backend URL must be valid"),
            timeout: None,
        }
    }
}

//! Switchboard configuration structures to map the switchboard.toml configuration.

#![deny(missing_docs)]

mod gateway;
mod health;
mod loader;
mod relay;

use std::path::Path;

pub use gateway::{GatewayConfig, ProxyConfig};
pub use health::HealthConfig;
pub use relay::{BackendConfig, CompletionConfig, CorsConfig, IntentConfig, RelayConfig};
use serde::Deserialize;

/// Main configuration structure for the Switchboard services.
///
/// Both services read the same file, each one only looks at its own section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chat relay configuration settings.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Static file and proxy gateway configuration settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates values serde cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }
}

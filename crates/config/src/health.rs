//! Health endpoint configuration, shared by the relay and the gateway.

use std::borrow::Cow;

use anyhow::bail;
use serde::Deserialize;

/// Health endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is enabled.
    pub enabled: bool,
    /// The path for the health endpoint, mounted next to the service's own routes.
    pub path: Cow<'static, str>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            enabled: true,
            path: Cow::Borrowed("/health"),
        }
    }
}

impl HealthConfig {
    /// Checks the path can be mounted in `section` without clashing with any of the `taken` routes.
    ///
    /// A disabled endpoint is never mounted, so its path is not checked.
    pub(crate) fn validate(&self, section: &str, taken: &[&str]) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if !self.path.starts_with('/') {
            bail!("{section}.health.path must start with '/', got '{}'", self.path);
        }

        if let Some(route) = taken.iter().find(|route| **route == self.path) {
            bail!("{section}.health.path '{}' is already used by '{route}'", self.path);
        }

        Ok(())
    }
}

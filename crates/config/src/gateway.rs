//! Static file and proxy gateway configuration.

use std::{
    borrow::Cow,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::PathBuf,
};

use serde::Deserialize;
use url::Url;

use crate::HealthConfig;

/// Static file and proxy gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// The socket address the gateway listens on.
    pub listen_address: SocketAddr,
    /// Directory served for every path outside the proxy prefix.
    pub public_dir: PathBuf,
    /// Health endpoint configuration.
    pub health: HealthConfig,
    /// Reverse proxy settings.
    pub proxy: ProxyConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000)),
            public_dir: PathBuf::from("public"),
            health: HealthConfig::default(),
            proxy: ProxyConfig::default(),
        }
    }
}

/// Reverse proxy configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Path prefix forwarded to the target. Stripped before forwarding.
    pub prefix: Cow<'static, str>,
    /// Base URL of the proxied backend.
    pub target: Url,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: Cow::Borrowed("/api"),
            target: Url::parse("http://localhost:5005").expect("default proxy target must be valid"),
        }
    }
}

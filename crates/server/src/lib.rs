//! Switchboard server library.
//!
//! Provides a reusable server function to serve the chat relay or the gateway,
//! either for the binary, or for the integration tests.

#![deny(missing_docs)]

mod health;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::Router;
use config::{Config, GatewayConfig, RelayConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// The service a process runs. The relay and the gateway never share a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The chat relay.
    Relay,
    /// The static file and proxy gateway.
    Gateway,
}

/// Configuration for serving one of the services.
pub struct ServeConfig {
    /// Which service to run.
    pub service: Service,
    /// The socket address (IP and port) the server will bind to.
    pub listen_address: SocketAddr,
    /// The deserialized Switchboard TOML configuration.
    pub config: Config,
}

/// Starts and runs the selected service with the provided configuration.
pub async fn serve(
    ServeConfig {
        service,
        listen_address,
        config,
    }: ServeConfig,
) -> anyhow::Result<()> {
    let app = match service {
        Service::Relay => relay_app(&config.relay)?,
        Service::Gateway => gateway_app(&config.gateway)?,
    };

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    match service {
        Service::Relay => {
            log::info!("Chat endpoint available at: http://{listen_address}{}", config.relay.path);
        }
        Service::Gateway => {
            log::info!(
                "Gateway running at http://{listen_address}, proxying {} requests to {}",
                config.gateway.proxy.prefix,
                config.gateway.proxy.target
            );
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    Ok(())
}

fn relay_app(config: &RelayConfig) -> anyhow::Result<Router> {
    let mut app = relay::router(config)?;

    if let Some(health) = health::router(&config.health) {
        app = app.merge(health);
    }

    if config.cors.enabled {
        app = app.layer(CorsLayer::permissive());
    } else {
        log::debug!("CORS disabled for the chat relay");
    }

    Ok(app)
}

fn gateway_app(config: &GatewayConfig) -> anyhow::Result<Router> {
    let health = health::router(&config.health);
    let mut app = gateway::router(config)?;

    if let Some(health) = health {
        app = app.merge(health);
    }

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    log::info!("Shutdown signal received, stopping server");
}

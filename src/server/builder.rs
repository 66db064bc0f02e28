//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

/// Load configuration from `config_path` and the environment, then serve
pub async fn run_server(config_path: impl AsRef<Path>) -> Result<()> {
    let config = Config::load(config_path).await?;
    run_with_config(config).await
}

/// Serve with an already loaded configuration
pub async fn run_with_config(config: Config) -> Result<()> {
    info!(
        environment = %config.gateway.environment,
        gateway_id = %config.server().gateway_id,
        "Starting edge gateway"
    );

    let server = ServerBuilder::new().with_config(config).build().await?;

    info!(
        services = server.state().dispatcher.registry().len(),
        routes = server.state().config.routes().len(),
        admission = server.state().admission.mode().as_str(),
        "Gateway ready at http://{}",
        server.config().address()
    );

    server.start().await
}

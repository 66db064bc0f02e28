//! Application state shared across HTTP handlers

use crate::auth::JwtHandler;
use crate::config::Config;
use crate::core::dispatcher::{Dispatcher, EndpointRegistry};
use crate::core::rate_limiter::AdmissionController;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// HTTP server state shared across handlers
///
/// Everything here is built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Admission control, strategy fixed at startup
    pub admission: Arc<AdmissionController>,
    /// Backend dispatcher
    pub dispatcher: Arc<Dispatcher>,
    /// Bearer token verification
    pub jwt: Arc<JwtHandler>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Assemble state around an already selected admission controller
    pub fn new(config: Config, admission: AdmissionController) -> Result<Self> {
        let registry = EndpointRegistry::from_config(&config.gateway.services)?;
        let dispatcher = Dispatcher::new(registry, config.gateway.server.gateway_id.clone())?;
        let jwt = JwtHandler::new(&config.gateway.auth);

        Ok(Self {
            config: Arc::new(config),
            admission: Arc::new(admission),
            dispatcher: Arc::new(dispatcher),
            jwt: Arc::new(jwt),
            started_at: Instant::now(),
        })
    }

    /// Build state from configuration, probing the shared store once
    pub async fn from_config(config: Config) -> Result<Self> {
        let admission =
            AdmissionController::from_config(config.rate_limit(), config.redis()).await;
        Self::new(config, admission)
    }

    /// Spawn the idle-bucket reaper when rate limiting is on and local
    pub fn start_reaper(&self) -> Option<JoinHandle<()>> {
        let rate_limit = self.config.rate_limit();
        if !rate_limit.enabled {
            return None;
        }
        self.admission.start_reaper(rate_limit.cleanup_interval())
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

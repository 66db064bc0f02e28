//! # Edge Gateway
//!
//! An HTTP edge gateway that sits in front of a set of backend services.
//!
//! Every inbound request passes two stages:
//!
//! - **Admission control**: a per-client request budget. A shared Redis
//!   fixed-window counter is used when Redis answers at startup, otherwise
//!   an in-process token bucket. Redis failures after startup fail open.
//! - **Dispatch**: the matched route names a backend service; the path is
//!   rewritten from route parameters, forwarding headers are stamped and
//!   the request is forwarded with a per-service timeout. Failures map to
//!   500 (unknown service), 502 (transport) and 504 (timeout).
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use edge_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::dispatcher::{DispatchRequest, Dispatcher, EndpointRegistry, ServiceEndpoint};
pub use core::rate_limiter::{
    AdmissionController, AdmissionDecision, AdmissionMode, ClientIdentity, CounterStore,
};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// A configured gateway ready to serve
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(&config).await?;
        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!(
            environment = %self.config.gateway.environment,
            admission = %self.server.state().admission.mode(),
            "Starting edge gateway"
        );
        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

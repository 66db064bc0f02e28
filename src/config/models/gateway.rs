//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Deployment environment (`development`, `staging`, `production`)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Admission control configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Shared counter store configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Backend services by name
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
    /// Inbound routes
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    /// Service receiving every request no route matched; 404 when unset
    #[serde(default)]
    pub fallback_service: Option<String>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            redis: RedisConfig::default(),
            services: HashMap::new(),
            routes: Vec::new(),
            fallback_service: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Apply `GATEWAY_*` environment overrides on top of the file values
    pub fn apply_env_overrides(&mut self) -> Result<(), String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; used directly by tests
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("GATEWAY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| format!("GATEWAY_PORT is not a valid port: {}", port))?;
        }
        if let Some(environment) = lookup("GATEWAY_ENVIRONMENT") {
            self.environment = environment;
        }
        if let Some(secret) = lookup("GATEWAY_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(url) = lookup("GATEWAY_REDIS_URL") {
            self.redis.url = url;
        }
        if let Some(rpm) = lookup("GATEWAY_RATE_LIMIT_RPM") {
            self.rate_limit.requests_per_minute = rpm
                .parse()
                .map_err(|_| format!("GATEWAY_RATE_LIMIT_RPM is not a number: {}", rpm))?;
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

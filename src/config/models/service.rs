//! Backend service and route configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A named backend service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Absolute base URL of the backend, e.g. `http://users:8081`
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in seconds; 0 selects the default
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ServiceConfig {
    /// Effective timeout, falling back to the default when unset
    pub fn timeout(&self) -> Duration {
        if self.timeout == 0 {
            Duration::from_secs(default_timeout())
        } else {
            Duration::from_secs(self.timeout)
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), String> {
        if self.base_url.is_empty() {
            // Unconfigured services are skipped by the registry
            return Ok(());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Service '{}' has invalid base_url: {}", name, e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Service '{}' must use http:// or https:// scheme, got: {}",
                    name, scheme
                ));
            }
        }

        if url.host_str().is_none() {
            return Err(format!("Service '{}' base_url must have a host", name));
        }

        Ok(())
    }
}

/// An inbound route forwarded to a backend service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Inbound path pattern; supports `:name` segments and a trailing `*name`
    pub path: String,
    /// Name of the service in the `services` map
    pub service: String,
    /// Backend path template; the inbound path is forwarded as-is when absent
    #[serde(default)]
    pub target: Option<String>,
    /// Allowed methods; empty means any
    #[serde(default)]
    pub methods: Vec<String>,
    /// Reject anonymous callers
    #[serde(default)]
    pub require_auth: bool,
    /// Caller must hold at least one of these roles
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RouteConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.path.starts_with('/') {
            return Err(format!("Route path '{}' must start with '/'", self.path));
        }

        if self.service.is_empty() {
            return Err(format!("Route '{}' must name a service", self.path));
        }

        if let Some(target) = &self.target
            && !target.starts_with('/')
        {
            return Err(format!(
                "Route '{}' target '{}' must start with '/'",
                self.path, target
            ));
        }

        for method in &self.methods {
            actix_web::http::Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|_| format!("Route '{}' has invalid method '{}'", self.path, method))?;
        }

        Ok(())
    }
}

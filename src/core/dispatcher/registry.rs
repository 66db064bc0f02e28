//! Endpoint registry: service name to backend base URL and timeout

use crate::config::ServiceConfig;
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Timeout applied when a service does not configure one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A resolved backend service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    name: String,
    base_url: Url,
    timeout: Duration,
}

impl ServiceEndpoint {
    /// A zero timeout selects [`DEFAULT_TIMEOUT`]
    pub fn new(name: impl Into<String>, base_url: Url, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            base_url,
            timeout: if timeout.is_zero() {
                DEFAULT_TIMEOUT
            } else {
                timeout
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host[:port]` of the backend, as sent in `X-Origin-Host`
    pub fn origin_host(&self) -> String {
        let host = self.base_url.host_str().unwrap_or_default();
        match self.base_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Full backend URL for `path`, prefixed by any base path
    pub fn url_for(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&join_paths(self.base_url.path(), path));
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Read-only map of configured services
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<String, Arc<ServiceEndpoint>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `services` section. Services without a base URL are skipped.
    pub fn from_config(services: &HashMap<String, ServiceConfig>) -> Result<Self> {
        let mut registry = Self::new();

        for (name, service) in services {
            if service.base_url.is_empty() {
                warn!(service = %name, "service has no base_url, skipping");
                continue;
            }

            let base_url = Url::parse(&service.base_url).map_err(|e| {
                GatewayError::config(format!("Service '{}' has invalid base_url: {}", name, e))
            })?;

            debug!(service = %name, url = %base_url, "registered backend service");
            registry.insert(ServiceEndpoint::new(name.clone(), base_url, service.timeout()));
        }

        Ok(registry)
    }

    pub fn insert(&mut self, endpoint: ServiceEndpoint) {
        self.endpoints
            .insert(endpoint.name.clone(), Arc::new(endpoint));
    }

    pub fn get(&self, name: &str) -> Option<Arc<ServiceEndpoint>> {
        self.endpoints.get(name).cloned()
    }

    /// Look up `name`, failing with [`GatewayError::UnknownService`]
    pub fn resolve(&self, name: &str) -> Result<Arc<ServiceEndpoint>> {
        self.get(name)
            .ok_or_else(|| GatewayError::unknown_service(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

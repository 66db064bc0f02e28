//! Whole-gateway configuration validator

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::{debug, warn};

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.server.cors.validate()?;
        self.auth.validate(self.is_production())?;
        self.rate_limit.validate()?;

        for (name, service) in &self.services {
            service.validate(name)?;
        }

        for route in &self.routes {
            route.validate()?;

            match self.services.get(&route.service) {
                None => warn!(
                    route = %route.path,
                    service = %route.service,
                    "route references an unknown service"
                ),
                Some(service) if service.base_url.is_empty() => warn!(
                    route = %route.path,
                    service = %route.service,
                    "route references a service without a base_url"
                ),
                Some(_) => {}
            }
        }

        if let Some(fallback) = &self.fallback_service
            && !self.services.contains_key(fallback)
        {
            warn!(service = %fallback, "fallback service is not configured");
        }

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

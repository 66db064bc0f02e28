//! Authentication configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to verify bearer tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Lifetime of issued tokens in seconds
    #[serde(default = "default_token_duration")]
    pub token_duration: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("token_duration", &self.token_duration)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: default_issuer(),
            token_duration: default_token_duration(),
        }
    }
}

impl AuthConfig {
    pub fn token_duration(&self) -> Duration {
        Duration::from_secs(self.token_duration)
    }

    /// Whether the placeholder secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == INSECURE_JWT_SECRET
    }

    /// Validate authentication configuration
    pub fn validate(&self, production: bool) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }

        if production && self.uses_default_secret() {
            return Err("JWT secret must be changed from default value in production".to_string());
        }

        if self.token_duration == 0 {
            return Err("Token duration must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Log warnings for configurations that are accepted but unsafe
pub fn warn_insecure_config(config: &AuthConfig) {
    if config.uses_default_secret() {
        warn!("Using default JWT secret. Set GATEWAY_JWT_SECRET before deploying.");
    } else if config.jwt_secret.len() < 32 {
        warn!("JWT secret is shorter than 32 characters");
    }
}

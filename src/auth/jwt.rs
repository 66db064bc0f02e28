//! JWT token handling
//!
//! HS256 bearer tokens carrying the caller's id, email, roles and tenant.

use crate::config::AuthConfig;
use crate::utils::error::{GatewayError, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// JWT handler for token operations
#[derive(Clone)]
pub struct JwtHandler {
    /// Encoding key for signing tokens
    encoding_key: EncodingKey,
    /// Decoding key for verifying tokens
    decoding_key: DecodingKey,
    /// JWT algorithm
    algorithm: Algorithm,
    /// Token lifetime in seconds
    expiration: u64,
    /// Token issuer
    issuer: String,
}

impl std::fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("expiration", &self.expiration)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at timestamp
    pub iat: u64,
    /// Not before timestamp
    pub nbf: u64,
    /// Expiration timestamp
    pub exp: u64,
}

impl Claims {
    /// Whether the caller holds at least one of `required`
    pub fn has_any_role(&self, required: &[String]) -> bool {
        required.iter().any(|role| self.roles.contains(role))
    }
}

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: config.token_duration,
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a token for a user
    pub fn create_token(
        &self,
        user_id: &str,
        email: &str,
        roles: Vec<String>,
        tenant_id: Option<String>,
    ) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GatewayError::internal(format!("System time error: {}", e)))?
            .as_secs();

        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            roles,
            tenant_id,
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + self.expiration,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(GatewayError::Jwt)?;

        debug!("Created token for user: {}", user_id);
        Ok(token)
    }

    /// Verify signature, issuer and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_nbf = true;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                debug!("JWT verification failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => GatewayError::unauthorized("token expired"),
                    _ => GatewayError::unauthorized("invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value
pub fn extract_bearer(header: &str) -> Result<&str> {
    let mut parts = header.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(GatewayError::unauthorized("invalid authorization header format"))
            } else {
                Ok(token)
            }
        }
        _ => Err(GatewayError::unauthorized(
            "invalid authorization header format",
        )),
    }
}

//! Error types for the Gateway

use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis errors
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated caller lacks a required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request cannot be forwarded as sent
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Admission denied for the calling identity
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Route references a service missing from the endpoint registry
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// Transport-level failure talking to a backend
    #[error("Failed to reach backend service: {0}")]
    BadGateway(String),

    /// Backend did not produce a response within its timeout
    #[error("Backend service did not respond in time: {0}")]
    GatewayTimeout(String),

    /// Shared counter store is unreachable or misbehaving
    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(String),

    /// Server lifecycle errors (bind, run)
    #[error("Server error: {0}")]
    Server(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

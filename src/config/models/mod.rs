//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod auth;
pub mod gateway;
pub mod rate_limit;
pub mod server;
pub mod service;
pub mod storage;

// Re-export all configuration types
pub use auth::*;
pub use gateway::*;
pub use rate_limit::*;
pub use server::*;
pub use service::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default backend timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Default graceful shutdown window in seconds
pub fn default_shutdown_timeout() -> u64 {
    30
}

/// Default time to receive request headers, in seconds
pub fn default_read_timeout() -> u64 {
    15
}

/// Default time to flush a response on a closing connection, in seconds
pub fn default_write_timeout() -> u64 {
    15
}

/// Default keep-alive idle window, in seconds
pub fn default_idle_timeout() -> u64 {
    60
}

pub fn default_gateway_id() -> String {
    "edge-gateway".to_string()
}

pub fn default_environment() -> String {
    "development".to_string()
}

pub fn default_rpm() -> u32 {
    100
}

pub fn default_cleanup_interval() -> u64 {
    60
}

pub fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_jwt_secret() -> String {
    INSECURE_JWT_SECRET.to_string()
}

pub fn default_issuer() -> String {
    "api-gateway".to_string()
}

pub fn default_token_duration() -> u64 {
    900 // 15 minutes
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

/// Placeholder secret shipped in defaults; rejected in production
pub const INSECURE_JWT_SECRET: &str = "change-me-in-production";

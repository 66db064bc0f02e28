//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests admitted per client per minute; also the local bucket capacity
    #[serde(default = "default_rpm")]
    pub requests_per_minute: u32,
    /// Interval between reaper sweeps of idle local buckets, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: default_rpm(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

impl RateLimitConfig {
    /// Reaper interval as a duration
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.requests_per_minute == 0 {
            return Err("requests per minute must be positive".to_string());
        }
        if self.cleanup_interval == 0 {
            return Err("cleanup interval must be positive".to_string());
        }
        Ok(())
    }
}

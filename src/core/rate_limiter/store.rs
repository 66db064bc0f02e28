//! Shared counter store abstraction

use crate::utils::error::Result;
use async_trait::async_trait;

/// Atomic per-key counter shared between gateway instances
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` by one and make it expire at `expire_at` (epoch seconds).
    /// Returns the post-increment count.
    async fn increment_window(&self, key: &str, expire_at: i64) -> Result<i64>;

    /// Liveness check
    async fn ping(&self) -> Result<()>;
}

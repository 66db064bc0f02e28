//! Fixed-window counter operations

use super::pool::RedisPool;
use crate::core::rate_limiter::CounterStore;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;

impl RedisPool {
    /// Atomically increment `key` and pin its expiry to `expire_at` (epoch seconds)
    ///
    /// Runs `INCR` and `EXPIREAT` in one `MULTI`/`EXEC` block. Re-setting the
    /// expiry on later increments of the same window is a no-op in effect.
    pub async fn increment_window(&self, key: &str, expire_at: i64) -> Result<i64> {
        let mut conn = self.connection.clone();
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire_at(key, expire_at)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(GatewayError::Redis)?;
        Ok(count)
    }
}

#[async_trait]
impl CounterStore for RedisPool {
    async fn increment_window(&self, key: &str, expire_at: i64) -> Result<i64> {
        RedisPool::increment_window(self, key, expire_at).await
    }

    async fn ping(&self) -> Result<()> {
        self.health_check().await
    }
}

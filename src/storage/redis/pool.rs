//! Redis connection management
//!
//! A single multiplexed connection is shared by every request task; the
//! connection is cheap to clone and safe for concurrent use.

use crate::config::RedisConfig;
use crate::utils::error::{GatewayError, Result};
use redis::{Client, aio::MultiplexedConnection};
use tracing::{debug, info};

/// Redis connection handle
#[derive(Clone)]
pub struct RedisPool {
    /// Multiplexed connection shared across tasks
    pub(crate) connection: MultiplexedConnection,
    /// Configuration
    pub(crate) config: RedisConfig,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &self.config.sanitized_url())
            .finish()
    }
}

impl RedisPool {
    /// Connect and ping once, bounded by `connection_timeout`
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        info!("Connecting to Redis at {}", config.sanitized_url());

        let timeout = config.connection_timeout();
        let client = Client::open(config.url.as_str()).map_err(GatewayError::Redis)?;

        let connection = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                GatewayError::store_unavailable(format!(
                    "Redis connection timed out after {:?}",
                    timeout
                ))
            })?
            .map_err(GatewayError::Redis)?;

        let pool = Self {
            connection,
            config: config.clone(),
        };

        tokio::time::timeout(timeout, pool.health_check())
            .await
            .map_err(|_| {
                GatewayError::store_unavailable(format!("Redis PING timed out after {:?}", timeout))
            })??;

        info!("Redis connection established");
        Ok(pool)
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(GatewayError::Redis)?;

        debug!("Redis health check passed");
        Ok(())
    }
}

//! Admission controller and strategy selection

use super::distributed::{DEFAULT_STORE_TIMEOUT, DistributedAdmission};
use super::local::LocalAdmission;
use super::store::CounterStore;
use super::types::{AdmissionDecision, AdmissionMode, ClientIdentity};
use crate::config::{RateLimitConfig, RedisConfig};
use crate::storage::RedisPool;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Decides whether a caller may proceed, using one strategy fixed at startup
#[derive(Debug, Clone)]
pub enum AdmissionController {
    /// Per-process token buckets
    Local(Arc<LocalAdmission>),
    /// Fixed-window counters in a shared store
    Distributed(DistributedAdmission),
}

impl AdmissionController {
    pub fn local(limit: u32) -> Self {
        Self::Local(Arc::new(LocalAdmission::new(limit)))
    }

    pub fn distributed(store: Arc<dyn CounterStore>, limit: u32) -> Self {
        Self::Distributed(DistributedAdmission::new(store, limit))
    }

    /// Use `store` if it answers a ping, otherwise fall back to local buckets
    pub async fn select(store: Option<Arc<dyn CounterStore>>, limit: u32) -> Self {
        Self::select_within(store, limit, DEFAULT_STORE_TIMEOUT).await
    }

    async fn select_within(store: Option<Arc<dyn CounterStore>>, limit: u32, timeout: Duration) -> Self {
        let Some(store) = store else {
            info!(limit, "using local admission control");
            return Self::local(limit);
        };

        match tokio::time::timeout(timeout, store.ping()).await {
            Ok(Ok(())) => {
                info!(limit, store_timeout = ?timeout, "using distributed admission control");
                Self::Distributed(DistributedAdmission::new(store, limit).with_store_timeout(timeout))
            }
            Ok(Err(e)) => {
                warn!(error = %e, "counter store ping failed, using local admission control");
                Self::local(limit)
            }
            Err(_) => {
                warn!(timeout = ?timeout, "counter store ping timed out, using local admission control");
                Self::local(limit)
            }
        }
    }

    /// Build from configuration, pinging Redis once when it is enabled.
    /// With rate limiting disabled the store is never pinged.
    pub async fn from_config(rate_limit: &RateLimitConfig, redis: &RedisConfig) -> Self {
        let limit = rate_limit.requests_per_minute;
        if !rate_limit.enabled {
            debug!("rate limiting disabled, skipping counter store ping");
            return Self::local(limit);
        }

        let store: Option<Arc<dyn CounterStore>> = if redis.enabled {
            match RedisPool::connect(redis).await {
                Ok(pool) => Some(Arc::new(pool)),
                Err(e) => {
                    warn!(url = %redis.sanitized_url(), error = %e, "Redis unavailable");
                    None
                }
            }
        } else {
            None
        };

        Self::select_within(store, limit, redis.connection_timeout()).await
    }

    /// Check and record one request for `identity`
    pub async fn allow(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> AdmissionDecision {
        match self {
            Self::Local(local) => local.allow(identity, now),
            Self::Distributed(distributed) => distributed.allow(identity, now).await,
        }
    }

    pub fn mode(&self) -> AdmissionMode {
        match self {
            Self::Local(_) => AdmissionMode::Local,
            Self::Distributed(_) => AdmissionMode::Distributed,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            Self::Local(local) => local.capacity(),
            Self::Distributed(distributed) => distributed.limit(),
        }
    }

    /// Spawn the idle-bucket reaper. Distributed mode has nothing to reap.
    pub fn start_reaper(&self, every: Duration) -> Option<JoinHandle<()>> {
        match self {
            Self::Local(local) => Some(local.clone().start_reaper(every)),
            Self::Distributed(_) => None,
        }
    }
}

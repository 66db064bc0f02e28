//! Fixed-window admission over a shared counter store

use super::store::CounterStore;
use super::types::{AdmissionDecision, ClientIdentity, WINDOW_SECS};
use crate::utils::error::GatewayError;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

const KEY_PREFIX: &str = "ratelimit:";

/// Upper bound on one store round trip unless configured otherwise
pub const DEFAULT_STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);

/// Start of the minute containing `now`
pub(super) fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let into_window = now.timestamp().rem_euclid(WINDOW_SECS);
    now - Duration::seconds(into_window)
        - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()))
}

/// Fixed one-minute window counter shared by every gateway instance
///
/// Across a window boundary a caller can be admitted up to twice the limit.
#[derive(Clone)]
pub struct DistributedAdmission {
    limit: u32,
    store: Arc<dyn CounterStore>,
    store_timeout: std::time::Duration,
}

impl std::fmt::Debug for DistributedAdmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedAdmission")
            .field("limit", &self.limit)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl DistributedAdmission {
    pub fn new(store: Arc<dyn CounterStore>, limit: u32) -> Self {
        Self {
            limit,
            store,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound each store round trip; an elapsed wait counts as a store failure
    pub fn with_store_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub(super) fn key(identity: &ClientIdentity) -> String {
        format!("{}{}", KEY_PREFIX, identity)
    }

    /// Count one request against the current window. Store failures and
    /// store calls slower than the store timeout admit the request.
    pub async fn allow(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> AdmissionDecision {
        let reset_at = window_start(now) + Duration::seconds(WINDOW_SECS);
        let key = Self::key(identity);

        let increment = self.store.increment_window(&key, reset_at.timestamp());
        let result = tokio::time::timeout(self.store_timeout, increment)
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::store_unavailable(format!(
                    "no reply within {:?}",
                    self.store_timeout
                )))
            });

        let count = match result {
            Ok(count) => count,
            Err(e) => {
                warn!(identity = %identity, error = %e, "counter store error, admitting request");
                return AdmissionDecision::fail_open(self.limit, now);
            }
        };

        let limit = i64::from(self.limit);
        let allowed = count <= limit;
        if !allowed {
            debug!(identity = %identity, count, limit, "distributed admission denied");
        }

        AdmissionDecision {
            allowed,
            limit: self.limit,
            remaining: (limit - count).max(0) as u32,
            reset_at,
        }
    }
}

//! In-memory token bucket admission

use super::types::{AdmissionDecision, ClientIdentity, WINDOW_SECS};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

const WINDOW_MILLIS: i64 = WINDOW_SECS * 1000;

/// Buckets idle for this many windows are reaped
const IDLE_WINDOWS: i64 = 10;

/// Per-identity token bucket
#[derive(Debug, Clone)]
pub(super) struct ClientBucket {
    pub(super) tokens: u32,
    pub(super) last_refill: DateTime<Utc>,
}

impl ClientBucket {
    fn full(capacity: u32, now: DateTime<Utc>) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
        }
    }

    fn refill(&mut self, capacity: u32, now: DateTime<Utc>) {
        let elapsed = (now - self.last_refill).num_milliseconds().max(0);

        if elapsed >= WINDOW_MILLIS {
            self.tokens = capacity;
            self.last_refill = now;
            return;
        }

        let added = (elapsed as u64 * capacity as u64 / WINDOW_MILLIS as u64) as u32;
        if added > 0 {
            self.tokens = self.tokens.saturating_add(added).min(capacity);
            self.last_refill = now;
        }
    }

    fn take(&mut self, capacity: u32, now: DateTime<Utc>) -> AdmissionDecision {
        self.refill(capacity, now);

        let allowed = self.tokens > 0;
        if allowed {
            self.tokens -= 1;
        }

        AdmissionDecision {
            allowed,
            limit: capacity,
            remaining: self.tokens,
            reset_at: self.last_refill + Duration::seconds(WINDOW_SECS),
        }
    }
}

/// Token bucket admission for a single gateway process
///
/// The map is sharded by identity hash; each bucket carries its own lock so
/// unrelated callers never contend on the same mutex.
#[derive(Debug)]
pub struct LocalAdmission {
    capacity: u32,
    buckets: DashMap<String, Arc<Mutex<ClientBucket>>>,
}

impl LocalAdmission {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            buckets: DashMap::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub(super) fn bucket(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> Arc<Mutex<ClientBucket>> {
        if let Some(existing) = self.buckets.get(identity.as_str()) {
            return existing.value().clone();
        }

        self.buckets
            .entry(identity.as_str().to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(ClientBucket::full(self.capacity, now))))
            .value()
            .clone()
    }

    /// Spend one token for `identity` if any are left
    pub fn allow(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> AdmissionDecision {
        // Shard guard is released before the bucket lock is taken
        let bucket = self.bucket(identity, now);
        let decision = bucket.lock().take(self.capacity, now);

        if !decision.allowed {
            debug!(identity = %identity, "local admission denied");
        }
        decision
    }

    /// Remove buckets whose last refill is older than ten windows.
    ///
    /// A bucket still held by an in-flight `allow` is kept, so its spent
    /// token is not lost with it.
    pub fn cleanup(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::seconds(WINDOW_SECS * IDLE_WINDOWS);
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            Arc::strong_count(bucket) > 1 || bucket.lock().last_refill >= cutoff
        });
        let removed = before.saturating_sub(self.buckets.len());

        if removed > 0 {
            debug!(removed, remaining = self.buckets.len(), "reaped idle client buckets");
        }
        removed
    }

    /// Number of tracked identities
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Start the background reaper; abort the handle to stop it
    pub fn start_reaper(self: Arc<Self>, every: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup(Utc::now());
            }
        })
    }

    #[cfg(test)]
    pub(super) fn snapshot(&self, identity: &ClientIdentity) -> Option<ClientBucket> {
        self.buckets
            .get(identity.as_str())
            .map(|bucket| bucket.lock().clone())
    }
}

//! Counter stores for exercising distributed admission without Redis

use async_trait::async_trait;
use edge_gateway::utils::error::{GatewayError, Result};
use edge_gateway::CounterStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Counters kept in process memory, with the expiry each key was given
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, (i64, i64)>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, key: &str) -> Option<i64> {
        self.counters.lock().get(key).map(|(count, _)| *count)
    }

    pub fn expiry(&self, key: &str) -> Option<i64> {
        self.counters.lock().get(key).map(|(_, expire_at)| *expire_at)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.counters.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment_window(&self, key: &str, expire_at: i64) -> Result<i64> {
        let mut counters = self.counters.lock();
        let entry = counters.entry(key.to_string()).or_insert((0, expire_at));
        // An expired window starts again from zero
        if entry.1 != expire_at {
            *entry = (0, expire_at);
        }
        entry.0 += 1;
        Ok(entry.0)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// A store that is down: every call fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl CounterStore for FailingStore {
    async fn increment_window(&self, _key: &str, _expire_at: i64) -> Result<i64> {
        Err(GatewayError::store_unavailable("connection refused"))
    }

    async fn ping(&self) -> Result<()> {
        Err(GatewayError::store_unavailable("connection refused"))
    }
}

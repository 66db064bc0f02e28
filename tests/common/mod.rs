//! Common test utilities for edge-gateway
//!
//! - In-memory and failing counter stores
//! - Gateway configuration fixtures

pub mod fixtures;
pub mod stores;

pub use fixtures::{ConfigFactory, bearer_for};
pub use stores::{FailingStore, MemoryCounterStore};

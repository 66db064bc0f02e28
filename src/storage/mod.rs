//! Storage layer for the Gateway
//!
//! Holds the shared counter store used by distributed admission control.

/// Redis-backed counter store
pub mod redis;

pub use self::redis::RedisPool;

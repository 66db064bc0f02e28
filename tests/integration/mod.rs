//! Integration tests for edge-gateway
//!
//! These tests verify the interaction between multiple components,
//! using mock backends and in-memory counter stores in place of real
//! services and Redis.

pub mod config_tests;
pub mod dispatch_tests;
pub mod pipeline_tests;

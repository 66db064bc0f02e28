//! Utility modules for the Gateway

pub mod error;

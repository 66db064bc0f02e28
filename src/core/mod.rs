//! Core functionality for the Gateway
//!
//! Admission control and backend dispatch, independent of the HTTP server.

pub mod dispatcher;
pub mod rate_limiter;

//! HTTP server implementation
//!
//! This module provides the HTTP server and routing functionality.

pub mod middleware;
pub mod routes;

pub mod builder;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server, run_with_config};
pub use server::{HttpServer, build_cors};
pub use state::AppState;

//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - Access log span fields
//! - Bearer token authentication
//! - Admission control (rate limiting)

mod access_log;
mod auth;
mod helpers;
mod rate_limit;
mod request_id;


pub use access_log::GatewayRootSpan;
pub use auth::{AuthMiddleware, AuthMiddlewareService, current_claims};
pub use helpers::{client_identity, error_body, is_health_route};
pub use rate_limit::{
    RateLimitMiddleware, RateLimitMiddlewareService, X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING,
    X_RATELIMIT_RESET, apply_headers,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService};

//! Caller authentication
//!
//! Bearer token verification and the claims attached to authenticated requests.

pub mod jwt;

pub use jwt::{Claims, JwtHandler, extract_bearer};

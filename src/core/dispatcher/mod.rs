//! Request dispatch to backend services
//!
//! Resolves a service through the [`EndpointRegistry`], rewrites the backend
//! path, stamps forwarding headers and forwards with a bounded wait. Failures
//! map to [`GatewayError`](crate::utils::error::GatewayError) variants:
//! dot segment in the backend path (400), unknown service (500), transport
//! error (502), timeout (504).

mod forward;
mod path;
mod registry;
mod request;


pub use forward::Dispatcher;
pub use path::{RewrittenPath, dot_segment, rewrite_path, to_actix_pattern};
pub use registry::{DEFAULT_TIMEOUT, EndpointRegistry, ServiceEndpoint};
pub use request::{
    DispatchRequest, X_FORWARDED_FOR, X_FORWARDED_HOST, X_GATEWAY, X_ORIGIN_HOST, X_REAL_IP,
    outbound_headers,
};

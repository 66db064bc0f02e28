//! Helper functions for middleware

use crate::auth::Claims;
use crate::core::rate_limiter::ClientIdentity;
use crate::utils::error::ErrorResponse;
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpResponse};

/// Liveness and readiness endpoints bypass auth and admission
pub fn is_health_route(path: &str) -> bool {
    path == "/health" || path.starts_with("/health/")
}

/// Client identity for admission: user id, then forwarded address, then peer
pub fn client_identity(req: &ServiceRequest) -> ClientIdentity {
    let user_id = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.user_id.clone());

    let forwarded_for = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());

    let peer = req.peer_addr().map(|addr| addr.ip().to_string());

    ClientIdentity::resolve(user_id.as_deref(), forwarded_for, peer.as_deref())
}

/// JSON `{error, message}` response with the reason phrase of `status`
pub fn error_body(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(status, message))
}

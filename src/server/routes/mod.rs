//! HTTP route modules

pub mod health;
pub mod proxy;

use crate::server::middleware::current_claims;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

/// Body returned for unmatched paths
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: &'static str,
    pub path: String,
}

pub fn not_found(req: &HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(NotFoundResponse {
        error: "Not Found",
        message: "The requested resource was not found",
        path: req.path().to_string(),
    })
}

/// Enforce a route's caller requirements against the attached claims
pub fn authorize(req: &HttpRequest, require_auth: bool, roles: &[String]) -> Result<()> {
    if !require_auth && roles.is_empty() {
        return Ok(());
    }

    let claims =
        current_claims(req).ok_or_else(|| GatewayError::unauthorized("Authentication required"))?;

    if !roles.is_empty() && !claims.has_any_role(roles) {
        return Err(GatewayError::forbidden("Insufficient permissions"));
    }
    Ok(())
}

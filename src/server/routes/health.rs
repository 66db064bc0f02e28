//! Health check and status endpoints

use crate::server::routes::authorize;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/ready", web::get().to(readiness))
            .route("/live", web::get().to(liveness)),
    )
    .route("/api/v1/public/status", web::get().to(public_status))
    .route("/api/v1/admin/system/status", web::get().to(system_status));
}

#[derive(Debug, Serialize)]
struct ProbeStatus {
    status: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    admission: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    services: Option<usize>,
}

impl ProbeStatus {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            admission: None,
            services: None,
        }
    }
}

/// Gateway status for the public and admin endpoints
#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub service: Cow<'static, str>,
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
}

impl GatewayStatus {
    fn from_state(state: &AppState) -> Self {
        Self {
            service: Cow::Owned(state.config.server().gateway_id.clone()),
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            environment: None,
            services: None,
        }
    }
}

/// Basic health check endpoint
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");
    HttpResponse::Ok().json(ProbeStatus::new("healthy"))
}

/// Readiness probe; reports the admission mode chosen at startup
async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let mut status = ProbeStatus::new("ready");
    status.admission = Some(state.admission.mode().as_str());
    status.services = Some(state.dispatcher.registry().len());
    HttpResponse::Ok().json(status)
}

async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(ProbeStatus::new("alive"))
}

async fn public_status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(GatewayStatus::from_state(&state))
}

/// Detailed status for callers holding the `admin` role
async fn system_status(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    authorize(&req, true, &["admin".to_string()])?;

    let mut services: Vec<String> = state.config.gateway.services.keys().cloned().collect();
    services.sort();

    let mut status = GatewayStatus::from_state(&state);
    status.environment = Some(state.config.gateway.environment.clone());
    status.services = Some(services);
    Ok(HttpResponse::Ok().json(status))
}

//! Configured backend routes

use crate::config::RouteConfig;
use crate::core::dispatcher::{DispatchRequest, to_actix_pattern};
use crate::server::routes::authorize;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, guard, web};
use std::sync::Arc;
use tracing::{debug, warn};

/// Register every configured route. Routes sharing a path become one
/// resource with a method-guarded route each.
pub fn configure_routes(cfg: &mut web::ServiceConfig, routes: &[RouteConfig]) {
    let mut grouped: Vec<(String, Vec<Arc<RouteConfig>>)> = Vec::new();
    for route in routes {
        let pattern = to_actix_pattern(&route.path);
        match grouped.iter_mut().find(|(existing, _)| *existing == pattern) {
            Some((_, group)) => group.push(Arc::new(route.clone())),
            None => grouped.push((pattern, vec![Arc::new(route.clone())])),
        }
    }

    for (pattern, group) in grouped {
        let mut resource = web::resource(pattern.as_str());
        for route in group {
            debug!(path = %route.path, service = %route.service, "registering route");
            resource = resource.route(method_route(&route).to(
                move |req: HttpRequest, body: web::Bytes, state: web::Data<AppState>| {
                    let route = Arc::clone(&route);
                    async move { proxy(req, body, state, route).await }
                },
            ));
        }
        cfg.service(resource);
    }
}

fn method_route(route: &RouteConfig) -> actix_web::Route {
    let methods: Vec<Method> = route
        .methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.to_uppercase().as_bytes()).ok())
        .collect();

    let mut iter = methods.into_iter();
    match iter.next() {
        None => web::route(),
        Some(first) => {
            let any = iter.fold(guard::Any(guard::Method(first)), |any, method| {
                any.or(guard::Method(method))
            });
            web::route().guard(any)
        }
    }
}

async fn proxy(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
    route: Arc<RouteConfig>,
) -> Result<HttpResponse> {
    authorize(&req, route.require_auth, &route.roles)?;

    let template = route.target.as_deref().unwrap_or(req.path()).to_string();
    let request = DispatchRequest::from_http(&req, body);

    state
        .dispatcher
        .forward(&route.service, &template, request)
        .await
        .inspect_err(|e| log_failure(&route.service, e))
}

/// Catch-all for unmatched paths: forward to the fallback service or 404
pub async fn fallback(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(service) = state.config.gateway.fallback_service.clone() else {
        return Ok(super::not_found(&req));
    };

    let path = req.path().to_string();
    let request = DispatchRequest::from_http(&req, body);
    state
        .dispatcher
        .forward(&service, &path, request)
        .await
        .inspect_err(|e| log_failure(&service, e))
}

fn log_failure(service: &str, error: &GatewayError) {
    if matches!(error, GatewayError::UnknownService(_)) {
        warn!(service, "route points at an unregistered service");
    }
}

//! Admission control middleware

use crate::core::rate_limiter::AdmissionDecision;
use crate::server::middleware::helpers::{client_identity, is_health_route};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{ResponseError, web};
use chrono::Utc;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Gates every request through the [`AdmissionController`](crate::core::rate_limiter::AdmissionController)
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().cloned();
            let state = match state {
                Some(state) if state.config.rate_limit().enabled => state,
                Some(_) => return Ok(service.call(req).await?.map_into_left_body()),
                None => {
                    warn!("application state missing, admission check skipped");
                    return Ok(service.call(req).await?.map_into_left_body());
                }
            };

            if is_health_route(req.path()) {
                return Ok(service.call(req).await?.map_into_left_body());
            }

            let identity = client_identity(&req);
            let now = Utc::now();
            let decision = state.admission.allow(&identity, now).await;

            if !decision.allowed {
                debug!(identity = %identity, path = %req.path(), "request denied by admission control");
                let mut response = GatewayError::rate_limit(identity.to_string()).error_response();
                let headers = response.headers_mut();
                apply_headers(headers, &decision);
                insert(headers, RETRY_AFTER, decision.retry_after_secs(now).to_string());
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            apply_headers(res.headers_mut(), &decision);
            Ok(res.map_into_left_body())
        })
    }
}

/// Set the `X-RateLimit-*` headers from a decision
pub fn apply_headers(headers: &mut HeaderMap, decision: &AdmissionDecision) {
    insert(headers, HeaderName::from_static(X_RATELIMIT_LIMIT), decision.limit.to_string());
    insert(
        headers,
        HeaderName::from_static(X_RATELIMIT_REMAINING),
        decision.remaining.to_string(),
    );
    insert(
        headers,
        HeaderName::from_static(X_RATELIMIT_RESET),
        decision.reset_epoch().to_string(),
    );
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(name, value);
    }
}

//! Authentication middleware

use crate::auth::{Claims, extract_bearer};
use crate::server::middleware::helpers::{error_body, is_health_route};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Verifies a bearer token when one is presented and attaches its [`Claims`]
///
/// Requests without an `Authorization` header continue anonymously; routes
/// decide whether they need a caller. A malformed or invalid token is a 401.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

/// Service implementation for auth middleware
pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_health_route(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().to_string());

        if let Some(header) = header {
            let verified = match req.app_data::<web::Data<AppState>>() {
                Some(state) => {
                    extract_bearer(&header).and_then(|token| state.jwt.verify_token(token))
                }
                None => Err(GatewayError::internal("missing application state")),
            };

            match verified {
                Ok(claims) => {
                    debug!(user_id = %claims.user_id, "authenticated request");
                    req.extensions_mut().insert(claims);
                }
                Err(e) => {
                    debug!("rejecting request with invalid credentials: {}", e);
                    let message = match &e {
                        GatewayError::Unauthorized(reason) => reason.clone(),
                        _ => "invalid token".to_string(),
                    };
                    let response = error_body(StatusCode::UNAUTHORIZED, &message);
                    return Box::pin(async move {
                        Ok(req.into_response(response).map_into_right_body())
                    });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

/// Claims of the authenticated caller, if any
pub fn current_claims(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

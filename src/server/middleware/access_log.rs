//! Root span for the per-request access log

use crate::auth::Claims;
use crate::server::middleware::request_id::RequestId;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder, root_span};

/// Adds the echoed `X-Request-ID` and the caller's user id to the
/// `TracingLogger` span, so access log lines match responses.
///
/// Must run inside [`RequestIdMiddleware`](super::RequestIdMiddleware).
/// Claims are attached by the auth middleware further in, so `user_id` is
/// recorded when the request ends.
pub struct GatewayRootSpan;

impl RootSpanBuilder for GatewayRootSpan {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let x_request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();

        root_span!(
            request,
            x_request_id = %x_request_id,
            user_id = tracing::field::Empty
        )
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        if let Ok(response) = outcome
            && let Some(claims) = response.request().extensions().get::<Claims>()
        {
            span.record("user_id", claims.user_id.as_str());
        }
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

//! Backend forwarding

use super::path::{dot_segment, rewrite_path};
use super::registry::{EndpointRegistry, ServiceEndpoint};
use super::request::{DispatchRequest, X_GATEWAY, is_hop_by_hop, outbound_headers};
use crate::utils::error::{GatewayError, Result};
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const POOL_IDLE_SECS: u64 = 90;
const POOL_SIZE: usize = 32;

/// Forwards requests to registered backend services
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<EndpointRegistry>,
    client: Client,
    gateway_id: String,
}

impl Dispatcher {
    pub fn new(registry: EndpointRegistry, gateway_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_SECS))
            .pool_max_idle_per_host(POOL_SIZE)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GatewayError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(registry, client, gateway_id))
    }

    pub fn with_client(
        registry: EndpointRegistry,
        client: Client,
        gateway_id: impl Into<String>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            client,
            gateway_id: gateway_id.into(),
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn gateway_id(&self) -> &str {
        &self.gateway_id
    }

    /// Forward `request` to `service`, rewriting `path_template` with the
    /// request's captured parameters.
    ///
    /// Paths that would contain a `.` or `..` segment after rewriting are
    /// rejected before anything is sent. Makes exactly one attempt. The wait for response headers is bounded by
    /// the service timeout; when it elapses the in-flight call is dropped.
    /// Once headers arrive the body is streamed through unbounded.
    pub async fn forward(
        &self,
        service: &str,
        path_template: &str,
        request: DispatchRequest,
    ) -> Result<HttpResponse> {
        let endpoint = self.registry.resolve(service)?;
        let rewritten = rewrite_path(path_template, &request.params);
        if let Some(segment) = dot_segment(&rewritten.path) {
            warn!(service, segment, "rejecting dot segment in backend path");
            return Err(GatewayError::bad_request(format!(
                "path segment '{}' is not allowed",
                segment
            )));
        }
        let url = endpoint.url_for(&rewritten.path, request.query.as_deref());

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| GatewayError::internal(format!("Unsupported method: {}", e)))?;
        let headers = outbound_headers(&request, &endpoint.origin_host(), &self.gateway_id);

        debug!(service, %method, %url, "forwarding request");

        let send = self
            .client
            .request(method, url)
            .headers(headers)
            .body(request.body)
            .send();

        let response = match tokio::time::timeout(endpoint.timeout(), send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(transport_error(&endpoint, e)),
            Err(_) => {
                warn!(service, timeout = ?endpoint.timeout(), "backend timed out");
                return Err(GatewayError::gateway_timeout(format!(
                    "{} did not respond within {:?}",
                    endpoint.name(),
                    endpoint.timeout()
                )));
            }
        };

        self.relay(response)
    }

    /// Copy status and headers from the backend, stamp the gateway id and
    /// stream the body to the caller
    fn relay(&self, response: reqwest::Response) -> Result<HttpResponse> {
        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| GatewayError::bad_gateway(format!("invalid status from backend: {}", e)))?;

        let mut builder = HttpResponse::build(status);
        for (name, value) in response.headers() {
            let name = name.as_str();
            if is_hop_by_hop(name)
                || name.eq_ignore_ascii_case("content-length")
                || name.eq_ignore_ascii_case(X_GATEWAY)
            {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                builder.append_header((name, value));
            }
        }
        builder.insert_header((X_GATEWAY, self.gateway_id.as_str()));

        Ok(builder.streaming(response.bytes_stream()))
    }
}

fn transport_error(endpoint: &ServiceEndpoint, error: reqwest::Error) -> GatewayError {
    warn!(service = endpoint.name(), error = %error, "backend unreachable");
    if error.is_timeout() {
        GatewayError::gateway_timeout(error.to_string())
    } else {
        GatewayError::bad_gateway(error.to_string())
    }
}

//! Inbound request snapshot and outbound header preparation

use actix_web::HttpRequest;
use actix_web::http::Method;
use actix_web::http::header::HeaderMap;
use bytes::Bytes;
use reqwest::header::{HeaderMap as OutboundHeaders, HeaderName, HeaderValue};
use std::collections::HashMap;

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_ORIGIN_HOST: &str = "x-origin-host";
pub const X_REAL_IP: &str = "x-real-ip";
pub const X_GATEWAY: &str = "x-gateway";

/// Headers that describe a single connection and are never forwarded
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub(crate) fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Owned view of an inbound request, detached from the actix request
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Caller's address (peer socket, without port)
    pub peer_addr: Option<String>,
    /// Host the caller addressed
    pub host: String,
    /// Parameters captured by the route pattern
    pub params: HashMap<String, String>,
    pub body: Bytes,
}

impl DispatchRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            peer_addr: None,
            host: String::new(),
            params: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn from_http(req: &HttpRequest, body: Bytes) -> Self {
        let query = req.query_string();
        let params = req
            .match_info()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            method: req.method().clone(),
            path: req.path().to_string(),
            query: (!query.is_empty()).then(|| query.to_string()),
            headers: req.headers().clone(),
            peer_addr: req.peer_addr().map(|addr| addr.ip().to_string()),
            host: req.connection_info().host().to_string(),
            params,
            body,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = actix_web::http::header::HeaderValue::from_str(value) {
            self.headers.append(
                actix_web::http::header::HeaderName::from_static(name),
                value,
            );
        }
        self
    }

    pub fn with_peer_addr(mut self, addr: impl Into<String>) -> Self {
        self.peer_addr = Some(addr.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into()).filter(|q| !q.is_empty());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Build the header set sent to the backend.
///
/// Copies the caller's headers minus hop-by-hop headers and `Host`, then
/// stamps the forwarding headers. The inbound map is left untouched.
pub fn outbound_headers(
    request: &DispatchRequest,
    origin_host: &str,
    gateway_id: &str,
) -> OutboundHeaders {
    let mut headers = OutboundHeaders::with_capacity(request.headers.len() + 5);

    for (name, value) in request.headers.iter() {
        let name = name.as_str();
        if is_hop_by_hop(name)
            || name.eq_ignore_ascii_case("host")
            || name.eq_ignore_ascii_case("content-length")
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    set(&mut headers, X_FORWARDED_HOST, &request.host);
    set(&mut headers, X_ORIGIN_HOST, origin_host);

    if let Some(peer) = request.peer_addr.as_deref() {
        if !headers.contains_key(X_REAL_IP) {
            set(&mut headers, X_REAL_IP, peer);
        }

        let forwarded_for = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(prior) if !prior.is_empty() => format!("{}, {}", prior, peer),
            _ => peer.to_string(),
        };
        set(&mut headers, X_FORWARDED_FOR, &forwarded_for);
    }

    set(&mut headers, X_GATEWAY, gateway_id);
    headers
}

fn set(headers: &mut OutboundHeaders, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}

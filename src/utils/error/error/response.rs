//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized(_) | GatewayError::Jwt(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            GatewayError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Config(_)
            | GatewayError::UnknownService(_)
            | GatewayError::Redis(_)
            | GatewayError::Serialization(_)
            | GatewayError::Yaml(_)
            | GatewayError::Io(_)
            | GatewayError::StoreUnavailable(_)
            | GatewayError::Server(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let message = match self {
            GatewayError::UnknownService(_) | GatewayError::Config(_) => {
                "Service configuration not found".to_string()
            }
            GatewayError::BadGateway(_) => self.to_string(),
            GatewayError::GatewayTimeout(_) => {
                "Backend service did not respond in time".to_string()
            }
            GatewayError::RateLimit(_) => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            GatewayError::Unauthorized(reason)
            | GatewayError::Forbidden(reason)
            | GatewayError::BadRequest(reason) => reason.clone(),
            GatewayError::Jwt(_) => "Invalid token".to_string(),
            _ => "An internal error occurred".to_string(),
        };

        HttpResponse::build(status_code).json(ErrorResponse::new(status_code, message))
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    /// Build a body whose `error` field is the canonical reason phrase of `status`
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: message.into(),
        }
    }
}

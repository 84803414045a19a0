//! API error handling for the dmbridge web surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::transfer::TransferError;
use crate::BridgeError;

/// Message returned when the data-management session is missing.
pub const LOGIN_REQUIRED: &str = "Please login first";

/// Message returned when the Box session is missing.
pub const BOX_LOGIN_REQUIRED: &str = "Please box login first";

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message, unchanged from the failing step.
    pub error: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Error carrying a status reported by a remote step; non-error codes become 500.
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        Self::new(status_from_u16(code), message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Map an upstream status onto a response status; anything unusable becomes 500.
fn status_from_u16(code: u16) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        ApiError::new(status_from_u16(err.status_code()), err.to_string())
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        let status = match &err {
            BridgeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BridgeError::InvalidReference(_) | BridgeError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            BridgeError::NotFound(_) => StatusCode::NOT_FOUND,
            other => other
                .upstream_status()
                .map(status_from_u16)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        ApiError::new(status, err.to_string())
    }
}

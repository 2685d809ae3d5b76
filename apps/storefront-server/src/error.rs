//! # API Error Type
//!
//! Unified error type for the HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler                                                                │
//! │  Result<Response, ApiError>                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Backend call failed? ─── ShellError::Backend ─────► 502 BACKEND_UNAVAILABLE
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bad input? ───────────── ShellError::Core ────────► 400 VALIDATION_ERROR
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Anything else ─────────────────────────────────────► 500 INTERNAL     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Composition failures never produce a partial Session Context; the body
//! is always `{ "code": ..., "message": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use storefront_shell::ShellError;

/// API error returned from handlers.
///
/// ```json
/// {
///   "code": "BACKEND_UNAVAILABLE",
///   "message": "Shop API request failed"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A shop API call failed (502)
    BackendUnavailable,

    /// Input validation failed (400)
    ValidationError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BackendUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts shell errors to API errors.
impl From<ShellError> for ApiError {
    fn from(err: ShellError) -> Self {
        if err.is_backend_failure() {
            tracing::error!(error = %err, "Shop API call failed");
            ApiError::new(ErrorCode::BackendUnavailable, "Shop API request failed")
        } else if err.is_validation_error() {
            ApiError::new(ErrorCode::ValidationError, err.to_string())
        } else {
            tracing::error!(error = %err, "Request failed");
            ApiError::internal("Request failed")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

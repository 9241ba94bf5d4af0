//! API response types
//!
//! Successful requests return the entity itself. Failures share one body:
//!
//! ```json
//! {"success": false, "error": {"code": "VALIDATION_ERROR", "message": "...", "details": [...]}}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::features::shared::validation::ValidationErrors;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an error response with details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }
}

/// 400 listing every offending field
pub fn validation_failed(errors: &ValidationErrors) -> Response {
    let body = match serde_json::to_value(errors.violations()) {
        Ok(details) => ErrorResponse::with_details(VALIDATION_ERROR, errors.first_message(), details),
        Err(_) => ErrorResponse::new(VALIDATION_ERROR, errors.first_message()),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// 400 for a business rule rejection
pub fn rejected(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(VALIDATION_ERROR, message)),
    )
        .into_response()
}

/// 500 carrying a message that is safe to show to clients
pub fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR, message)),
    )
        .into_response()
}

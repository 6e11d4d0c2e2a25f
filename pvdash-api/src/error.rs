//! Request-time error responses
//!
//! Everything that can go wrong while serving the dashboard is reported to the
//! client as a generic 500. The underlying cause is only written to the log.

use crate::dashboard::template::TemplateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Errors surfaced by the dashboard route
#[derive(Debug)]
pub enum ApiError {
    /// Template could not be read or parsed
    TemplateLoad(String),

    /// Template parsed but failed to render the snapshot
    TemplateRender(String),
}

impl ApiError {
    /// Log the cause and build the client-facing body
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::TemplateLoad(msg) => {
                error!("Template error: {}", msg);
                ErrorResponse::new(500, "TEMPLATE_LOAD_ERROR", "Error loading template")
            }
            ApiError::TemplateRender(msg) => {
                error!("Render error: {}", msg);
                ErrorResponse::new(500, "TEMPLATE_RENDER_ERROR", "Error rendering the template")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = self.to_error_response();
        let status_code = StatusCode::from_u16(error_response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(error_response)).into_response()
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Read { .. } | TemplateError::Parse(_) => {
                ApiError::TemplateLoad(err.to_string())
            }
            TemplateError::Render(_) => ApiError::TemplateRender(err.to_string()),
        }
    }
}

//! JSON error body shared by every endpoint.
//!
//! Shape: `{ "error", "message", "code", "details"? }`. `details` is only
//! filled in when the server runs in development.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ChatError;
use crate::domain::foundation::ErrorCode;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(
        status: StatusCode,
        code: ErrorCode,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            code: code.as_str().to_string(),
            details: None,
        }
    }

    /// Attaches diagnostic details when `expose` is true.
    pub fn with_details(mut self, expose: bool, details: impl Into<serde_json::Value>) -> Self {
        if expose {
            self.details = Some(details.into());
        }
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationFailed,
            "Validation error",
            message,
        )
    }

    pub fn message_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::MessageTooLarge,
            "Request too large",
            message,
        )
    }

    pub fn session_expired() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::SessionExpired,
            "Session not found",
            "Your chat session has expired. Please start a new conversation.",
        )
    }

    pub fn invalid_json() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidJson,
            "Invalid JSON",
            "The request contains invalid JSON data.",
        )
    }

    pub fn route_not_found(method: &str, path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::RouteNotFound,
            "Route not found",
            format!("The requested endpoint {} {} was not found.", method, path),
        )
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::RateLimited,
            "Rate limit exceeded",
            format!(
                "Too many requests. Please wait {} seconds before trying again.",
                retry_after_secs
            ),
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Internal server error",
            "Something went wrong. Please try again.",
        )
    }

    /// Maps an orchestrator error; `expose` controls `details`.
    pub fn from_chat_error(error: &ChatError, expose: bool) -> Self {
        let response = match error {
            ChatError::ValidationFailed { message, .. } => Self::validation(message.clone()),
            ChatError::MessageTooLarge { .. } => Self::message_too_large(
                "Your message is too long. Please try a shorter message.",
            ),
            ChatError::SessionNotFound(_) => Self::session_expired(),
            ChatError::Internal(_) => Self::internal(),
        };
        response.with_details(expose, error.message())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

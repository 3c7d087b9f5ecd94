//! Chat orchestration error types.

use crate::domain::foundation::{ErrorCode, SessionId};
use crate::ports::SessionStoreError;

/// Failures surfaced by the chat handlers.
///
/// Provider errors never appear here; they are turned into fallback replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Input failed validation.
    ValidationFailed { field: String, message: String },
    /// Message exceeds the configured length.
    MessageTooLarge { max: usize, actual: usize },
    /// Session is unknown or has expired.
    SessionNotFound(SessionId),
    /// Infrastructure error.
    Internal(String),
}

impl ChatError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ChatError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ChatError::Internal(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ChatError::MessageTooLarge { .. } => ErrorCode::MessageTooLarge,
            ChatError::SessionNotFound(_) => ErrorCode::SessionExpired,
            ChatError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ChatError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ChatError::MessageTooLarge { max, actual } => {
                format!("Message is {} characters; the limit is {}", actual, max)
            }
            ChatError::SessionNotFound(_) => {
                "Chat session not found or has expired. Please start a new session.".to_string()
            }
            ChatError::Internal(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ChatError {}

impl From<SessionStoreError> for ChatError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => ChatError::SessionNotFound(id),
            SessionStoreError::Unavailable(msg) => ChatError::Internal(msg),
        }
    }
}

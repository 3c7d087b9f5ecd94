//! Replies used when the completion provider cannot answer.

use crate::ports::AIError;

/// Broad category of provider failure, used to pick fallback copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackKind {
    Technical,
    RateLimited,
    Connectivity,
    ContextTooLong,
}

impl FallbackKind {
    pub fn from_error(error: &AIError) -> Self {
        match error {
            AIError::RateLimited { .. } => Self::RateLimited,
            AIError::Timeout { .. } | AIError::Network(_) => Self::Connectivity,
            AIError::ContextTooLong => Self::ContextTooLong,
            AIError::QuotaExceeded
            | AIError::InvalidCredential
            | AIError::Overloaded { .. }
            | AIError::ContentFiltered { .. }
            | AIError::Parse(_)
            | AIError::InvalidRequest(_)
            | AIError::NotConfigured => Self::Technical,
        }
    }

    /// User-facing copy for this kind of failure.
    pub fn text(&self) -> &'static str {
        match self {
            Self::Technical => {
                "I'm experiencing some technical difficulties right now, but I'm still here to \
                 support you. Can you tell me more about what's on your mind?"
            }
            Self::RateLimited => {
                "I need a moment to catch up, but I'm still here with you. While we wait, \
                 could you share a little more about what you're feeling?"
            }
            Self::Connectivity => {
                "I'm having trouble connecting right now, but I haven't gone anywhere. \
                 Would you like to tell me more about what's on your mind?"
            }
            Self::ContextTooLong => {
                "Our conversation has gotten long enough that I'm having trouble keeping up. \
                 Could you tell me what feels most important to talk about right now?"
            }
        }
    }
}

/// Used when the provider answers with nothing but whitespace.
pub const EMPTY_REPLY_TEXT: &str =
    "I'm here to listen and support you. Can you tell me more about how you're feeling?";

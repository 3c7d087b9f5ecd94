//! Chat message entity.
//!
//! Messages are immutable once appended to a session. The builder-style
//! `with_*` methods consume the message, so they only apply before the
//! message is handed to the store.

use crate::domain::foundation::{MessageId, Timestamp};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// The person seeking support.
    User,
    /// Model reply, crisis response, or fallback.
    #[serde(rename = "bot")]
    Assistant,
    /// Injected safety notice. Shown to the user, never sent to the model.
    Notice,
}

impl SenderRole {
    /// Returns true if messages from this sender are part of the model dialogue.
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

/// Urgency tag attached to messages and crisis resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

/// A single entry in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    sender: SenderRole,
    text: String,
    timestamp: Timestamp,
    priority: Option<Priority>,
    suggested_replies: Vec<String>,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(sender: SenderRole, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            text: text.into(),
            timestamp: Timestamp::now(),
            priority: None,
            suggested_replies: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(SenderRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(SenderRole::Assistant, text)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(SenderRole::Notice, text)
    }

    /// Tags the message with a priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches quick replies offered after this message.
    pub fn with_suggested_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_replies = replies.into_iter().map(Into::into).collect();
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn sender(&self) -> SenderRole {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn suggested_replies(&self) -> &[String] {
        &self.suggested_replies
    }

    pub fn is_user(&self) -> bool {
        self.sender == SenderRole::User
    }
}

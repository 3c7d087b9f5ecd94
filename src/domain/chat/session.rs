//! Chat session aggregate.
//!
//! # Invariants
//!
//! - `messages` keeps insertion order; appends never reorder retained entries
//! - trimming to the history cap only ever removes the oldest messages
//! - `last_activity` never moves backwards

use crate::domain::foundation::{SessionId, Timestamp};
use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use super::profile::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    id: SessionId,
    profile: UserProfile,
    messages: Vec<ChatMessage>,
    created_at: Timestamp,
    last_activity: Timestamp,
}

impl ChatSession {
    /// Opens an empty session for the given profile.
    pub fn new(profile: UserProfile) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            profile,
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Appends a message and bumps `last_activity`.
    ///
    /// When the history grows past `max_messages`, the oldest entries are
    /// discarded. A cap of zero disables trimming.
    pub fn append(&mut self, message: ChatMessage, max_messages: usize) {
        self.messages.push(message);
        if max_messages > 0 && self.messages.len() > max_messages {
            let excess = self.messages.len() - max_messages;
            self.messages.drain(..excess);
        }
        self.touch();
    }

    /// Marks the session as active now.
    pub fn touch(&mut self) {
        let now = Timestamp::now();
        if self.last_activity.is_before(&now) {
            self.last_activity = now;
        }
    }

    /// True if the session has seen no activity since `cutoff`.
    pub fn is_idle_since(&self, cutoff: &Timestamp) -> bool {
        self.last_activity.is_before(cutoff)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    #[cfg(test)]
    pub(crate) fn set_last_activity(&mut self, at: Timestamp) {
        self.last_activity = at;
    }
}

//! Session store port.
//!
//! Defines the contract for holding chat sessions between requests. The
//! orchestrator only talks to this trait, so the in-process map can be
//! swapped for a shared key-value store without touching handlers.
//!
//! # Design
//!
//! - **Whole-aggregate reads**: `get` and `append` return an owned snapshot
//! - **Atomic per call**: each method is one critical section
//! - **Ephemeral**: sessions disappear after `sweep`, no durability promise

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, ChatSession, UserProfile};
use crate::domain::foundation::SessionId;

/// Store port for chat session lifecycle.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocate a new session with an empty history.
    async fn create(&self, profile: UserProfile) -> Result<ChatSession, SessionStoreError>;

    /// Fetch a snapshot of a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id is unknown or already swept
    async fn get(&self, id: &SessionId) -> Result<ChatSession, SessionStoreError>;

    /// Append a message and bump last activity.
    ///
    /// Returns the session as it looks after the append.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id is unknown or already swept
    async fn append(
        &self,
        id: &SessionId,
        message: ChatMessage,
    ) -> Result<ChatSession, SessionStoreError>;

    /// Remove a session explicitly.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id is unknown
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Remove every session idle for longer than `max_idle`.
    ///
    /// Returns the number of sessions removed.
    async fn sweep(&self, max_idle: Duration) -> Result<usize, SessionStoreError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, SessionStoreError>;
}

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// No session with this id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// Backend failure.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

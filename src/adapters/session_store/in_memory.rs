//! In-memory session store.
//!
//! Sessions live in a `HashMap` behind a tokio `RwLock`. Each port method
//! takes the lock once, so appends to the same session are applied in lock
//! acquisition order and never interleave.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::chat::{ChatMessage, ChatSession, UserProfile};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionStore, SessionStoreError};

/// Process-local session store.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, ChatSession>>>,
    /// Per-session history cap; 0 disables the cap.
    max_messages: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Creates an empty store without a history cap.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_messages: 0,
        }
    }

    /// Caps stored history per session; the oldest messages are dropped.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Inserts a prepared session (tests seed idle sessions this way).
    #[cfg(test)]
    pub(crate) async fn insert(&self, session: ChatSession) {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, profile: UserProfile) -> Result<ChatSession, SessionStoreError> {
        let session = ChatSession::new(profile);
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<ChatSession, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionStoreError::NotFound(*id))
    }

    async fn append(
        &self,
        id: &SessionId,
        message: ChatMessage,
    ) -> Result<ChatSession, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SessionStoreError::NotFound(*id))?;
        session.append(message, self.max_messages);
        Ok(session.clone())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionStoreError::NotFound(*id))
    }

    async fn sweep(&self, max_idle: Duration) -> Result<usize, SessionStoreError> {
        let cutoff = Timestamp::now().minus(max_idle);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle_since(&cutoff));
        Ok(before - sessions.len())
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }
}

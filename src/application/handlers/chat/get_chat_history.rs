//! GetChatHistoryHandler - Query handler for a session's transcript.

use std::sync::Arc;

use crate::domain::chat::ChatSession;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::errors::ChatError;

/// Query for a full session snapshot.
#[derive(Debug, Clone)]
pub struct GetChatHistoryQuery {
    pub session_id: SessionId,
}

/// Handler for reading sessions. Never mutates the store.
pub struct GetChatHistoryHandler {
    store: Arc<dyn SessionStore>,
}

impl GetChatHistoryHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetChatHistoryQuery) -> Result<ChatSession, ChatError> {
        Ok(self.store.get(&query.session_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session_store::InMemorySessionStore;
    use crate::domain::chat::{ChatMessage, UserProfile};

    #[tokio::test]
    async fn returns_session_without_touching_it() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = *store.create(UserProfile::default()).await.unwrap().id();
        store.append(&id, ChatMessage::user("hi")).await.unwrap();
        let handler = GetChatHistoryHandler::new(store.clone());

        let first = handler.handle(GetChatHistoryQuery { session_id: id }).await.unwrap();
        let second = handler.handle(GetChatHistoryQuery { session_id: id }).await.unwrap();

        assert_eq!(first.messages().len(), 1);
        assert_eq!(first.last_activity(), second.last_activity());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetChatHistoryHandler::new(Arc::new(InMemorySessionStore::new()));
        let id = SessionId::new();

        let err = handler.handle(GetChatHistoryQuery { session_id: id }).await.unwrap_err();
        assert_eq!(err, ChatError::SessionNotFound(id));
    }
}

//! InitializeSessionHandler - Opens a chat session with a greeting.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::chat::{template_welcome, welcome_context, welcome_replies, ChatMessage, ChatSession, UserProfile};
use crate::domain::crisis::crisis_support_notice;
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata, SessionStore};

use super::completion::complete_within;
use super::errors::ChatError;
use super::settings::ChatSettings;

/// Command to start a new chat session.
#[derive(Debug, Clone, Default)]
pub struct InitializeSessionCommand {
    pub profile: UserProfile,
}

/// Result of opening a session.
#[derive(Debug, Clone)]
pub struct InitializeSessionResult {
    pub session_id: SessionId,
    /// Greeting, followed by the safety notice for crisis intakes.
    pub messages: Vec<ChatMessage>,
    pub requires_crisis_panel: bool,
    pub quick_replies: Vec<String>,
}

/// Handler for opening chat sessions.
pub struct InitializeSessionHandler {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AIProvider>,
    settings: ChatSettings,
}

impl InitializeSessionHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn AIProvider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitializeSessionCommand,
    ) -> Result<InitializeSessionResult, ChatError> {
        let session = self.store.create(cmd.profile).await?;
        let session_id = *session.id();
        let profile = session.profile();

        let welcome = ChatMessage::assistant(self.welcome_text(&session).await)
            .with_suggested_replies(welcome_replies(profile.is_struggling()));
        self.store.append(&session_id, welcome.clone()).await?;
        let mut messages = vec![welcome];

        let requires_crisis_panel = profile.is_in_crisis();
        if requires_crisis_panel {
            let notice = crisis_support_notice();
            self.store.append(&session_id, notice.clone()).await?;
            messages.push(notice);
        }

        let quick_replies = messages
            .last()
            .map(|m| m.suggested_replies().to_vec())
            .unwrap_or_default();

        info!(
            session_id = %session_id,
            requires_crisis_panel,
            "Chat session initialized"
        );

        Ok(InitializeSessionResult {
            session_id,
            messages,
            requires_crisis_panel,
            quick_replies,
        })
    }

    /// Model-written greeting, or the template when the provider can't help.
    async fn welcome_text(&self, session: &ChatSession) -> String {
        let request = CompletionRequest::new(RequestMetadata::new(
            *session.id(),
            Uuid::new_v4().to_string(),
        ))
        .with_messages(welcome_context(session.profile()))
        .with_max_tokens(self.settings.max_output_tokens)
        .with_temperature(self.settings.temperature);

        match complete_within(self.provider.as_ref(), request, self.settings.completion_timeout).await {
            Ok(response) if !response.content.trim().is_empty() => {
                response.content.trim().to_string()
            }
            Ok(_) => template_welcome(session.profile()),
            Err(err) => {
                warn!(
                    session_id = %session.id(),
                    error = %err,
                    kind = err.kind(),
                    "Welcome generation failed, using template"
                );
                template_welcome(session.profile())
            }
        }
    }
}

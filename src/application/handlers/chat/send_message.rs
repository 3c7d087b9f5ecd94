//! SendMessageHandler - Processes one user turn.
//!
//! `Received → CrisisCheck → {CrisisResponse | NormalResponse} → Persisted`.
//! Every accepted user message gets exactly one assistant reply in the same
//! call, whether from the model, the crisis script, or fallback copy.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::chat::{
    fallback_replies, suggest_replies, ChatMessage, ChatSession, ContextBuilder, FallbackKind,
    EMPTY_REPLY_TEXT,
};
use crate::domain::crisis::{crisis_response, CrisisDetector};
use crate::domain::foundation::SessionId;
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata, SessionStore};

use super::completion::complete_within;
use super::errors::ChatError;
use super::settings::ChatSettings;

/// Command carrying one user message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub session_id: SessionId,
    pub text: String,
}

/// The stored user message and its reply.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    /// `[user, assistant]`
    pub messages: Vec<ChatMessage>,
    pub requires_crisis_panel: bool,
    pub quick_replies: Vec<String>,
}

/// Handler for user chat turns.
pub struct SendMessageHandler {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AIProvider>,
    detector: CrisisDetector,
    context: ContextBuilder,
    settings: ChatSettings,
}

impl SendMessageHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn AIProvider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            store,
            provider,
            detector: CrisisDetector::default(),
            context: ContextBuilder::new(settings.history_window),
            settings,
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, ChatError> {
        let session = self.store.get(&cmd.session_id).await?;

        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(ChatError::validation("message", "Message cannot be empty"));
        }
        let length = cmd.text.chars().count();
        if length > self.settings.max_message_chars {
            return Err(ChatError::MessageTooLarge {
                max: self.settings.max_message_chars,
                actual: length,
            });
        }

        let user_message = ChatMessage::user(text);
        self.store.append(&cmd.session_id, user_message.clone()).await?;

        let assessment = self.detector.assess(text);
        let reply = if assessment.is_crisis() {
            warn!(
                session_id = %cmd.session_id,
                severity = ?assessment.severity,
                matched = assessment.matched.len(),
                "Crisis language detected, sending crisis resources"
            );
            crisis_response()
        } else {
            self.generate_reply(&session, text).await
        };

        self.store.append(&cmd.session_id, reply.clone()).await?;

        let quick_replies = reply.suggested_replies().to_vec();
        Ok(SendMessageResult {
            messages: vec![user_message, reply],
            requires_crisis_panel: assessment.is_crisis(),
            quick_replies,
        })
    }

    /// Asks the provider for a reply; `session` is the pre-append snapshot.
    async fn generate_reply(&self, session: &ChatSession, text: &str) -> ChatMessage {
        let request = CompletionRequest::new(RequestMetadata::new(
            *session.id(),
            Uuid::new_v4().to_string(),
        ))
        .with_messages(self.context.build(session, text))
        .with_max_tokens(self.settings.max_output_tokens)
        .with_temperature(self.settings.temperature);

        match complete_within(self.provider.as_ref(), request, self.settings.completion_timeout).await {
            Ok(response) => {
                let content = response.content.trim();
                info!(
                    session_id = %session.id(),
                    model = %response.model,
                    completion_tokens = response.usage.completion_tokens,
                    "Completion received"
                );
                let content = if content.is_empty() { EMPTY_REPLY_TEXT } else { content };
                ChatMessage::assistant(content)
                    .with_suggested_replies(suggest_replies(content, text))
            }
            Err(err) => self.fallback_reply(session.id(), &err),
        }
    }

    fn fallback_reply(&self, session_id: &SessionId, err: &AIError) -> ChatMessage {
        let kind = FallbackKind::from_error(err);
        if matches!(
            err,
            AIError::NotConfigured | AIError::RateLimited { .. } | AIError::Timeout { .. }
        ) {
            warn!(
                session_id = %session_id,
                error = %err,
                kind = err.kind(),
                "Completion unavailable, sending fallback"
            );
        } else {
            error!(
                session_id = %session_id,
                error = %err,
                kind = err.kind(),
                "Completion failed, sending fallback"
            );
        }
        ChatMessage::assistant(kind.text()).with_suggested_replies(fallback_replies())
    }
}

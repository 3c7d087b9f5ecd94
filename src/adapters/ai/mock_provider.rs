//! Scripted completion provider for tests.
//!
//! Replies are consumed in the order they were queued. Once the script is
//! exhausted every call answers with a generic supportive line, so tests
//! that do not care about model output need no setup.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const DEFAULT_REPLY: &str = "Thank you for sharing that with me.";

/// Provider failure to inject. Mirrors the `AIError` kinds the chat
/// handlers branch on.
#[derive(Debug, Clone)]
pub enum MockError {
    QuotaExceeded,
    RateLimited { retry_after_secs: u32 },
    InvalidCredential,
    Overloaded { message: String },
    ContextTooLong,
    Network { message: String },
    Timeout { timeout_secs: u32 },
    NotConfigured,
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::QuotaExceeded => AIError::QuotaExceeded,
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::InvalidCredential => AIError::InvalidCredential,
            MockError::Overloaded { message } => AIError::overloaded(message),
            MockError::ContextTooLong => AIError::ContextTooLong,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
            MockError::NotConfigured => AIError::NotConfigured,
        }
    }
}

type Script = VecDeque<Result<String, MockError>>;

/// Test double for `AIProvider`. Clones share the script and call log.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(Err(error));
        self
    }

    /// Sleeps this long before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Every request received so far, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, entry: Result<String, MockError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
    }

    fn next(&self) -> Result<String, MockError> {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let content = self.next()?;
        Ok(CompletionResponse {
            usage: TokenUsage::new(10, content.split_whitespace().count() as u32),
            content,
            model: "mock".to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock")
    }
}

//! Stand-in provider used when no API key is configured.
//!
//! Every call fails with `NotConfigured`, which the orchestrator turns into
//! fallback copy. Crisis detection never reaches a provider, so it keeps
//! working.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

#[derive(Debug, Clone)]
pub struct DisabledProvider {
    name: String,
}

impl DisabledProvider {
    /// `name` is the provider that would have been used had a key been set.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl AIProvider for DisabledProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::NotConfigured)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new(&self.name, "none")
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::RequestMetadata;

    #[tokio::test]
    async fn always_not_configured() {
        let provider = DisabledProvider::new("openai");
        let request = CompletionRequest::new(RequestMetadata::new(SessionId::new(), "t"));

        let err = provider.complete(request).await.unwrap_err();
        assert!(matches!(err, AIError::NotConfigured));
        assert!(!provider.is_configured());
        assert_eq!(provider.provider_info().name, "openai");
    }
}

//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions
//! - `GeminiProvider` - Google Gemini `generateContent`
//! - `MockAIProvider` - Configurable mock for testing
//! - `DisabledProvider` - Used when no API key is configured

mod disabled_provider;
mod gemini_provider;
mod mock_provider;
mod openai_provider;
mod retry;

pub use disabled_provider::DisabledProvider;
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use retry::{with_retry, RetryPolicy};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AiConfig, AiProvider as ProviderKind};
use crate::ports::AIProvider;

/// Builds the completion provider selected by configuration.
///
/// Falls back to [`DisabledProvider`] when the selected provider has no
/// API key or its HTTP client cannot be created.
pub fn build_provider(config: &AiConfig) -> Arc<dyn AIProvider> {
    let name = config.provider.as_str();

    let built = match config.provider {
        ProviderKind::OpenAI => config.openai_api_key.as_deref().filter(|_| config.has_openai()).map(|key| {
            OpenAIProvider::new(
                OpenAIConfig::new(key)
                    .with_model(&config.openai_model)
                    .with_base_url(&config.openai_base_url)
                    .with_timeout(config.timeout())
                    .with_max_retries(config.max_retries),
            )
            .map(|p| Arc::new(p) as Arc<dyn AIProvider>)
        }),
        ProviderKind::Gemini => config.gemini_api_key.as_deref().filter(|_| config.has_gemini()).map(|key| {
            GeminiProvider::new(
                GeminiConfig::new(key)
                    .with_model(&config.gemini_model)
                    .with_base_url(&config.gemini_base_url)
                    .with_timeout(config.timeout())
                    .with_max_retries(config.max_retries),
            )
            .map(|p| Arc::new(p) as Arc<dyn AIProvider>)
        }),
    };

    match built {
        Some(Ok(provider)) => {
            let info = provider.provider_info();
            info!(provider = %info.name, model = %info.model, "Completion provider configured");
            provider
        }
        Some(Err(err)) => {
            warn!(provider = name, error = %err, "Completion provider unavailable, replies will use fallback text");
            Arc::new(DisabledProvider::new(name))
        }
        None => {
            warn!(provider = name, "No API key configured, replies will use fallback text");
            Arc::new(DisabledProvider::new(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_disabled_provider() {
        let provider = build_provider(&AiConfig::default());
        assert!(!provider.is_configured());
        assert_eq!(provider.provider_info().name, "openai");
    }

    #[test]
    fn blank_key_yields_disabled_provider() {
        let config = AiConfig {
            provider: ProviderKind::Gemini,
            gemini_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        let provider = build_provider(&config);
        assert!(!provider.is_configured());
        assert_eq!(provider.provider_info().name, "gemini");
    }

    #[test]
    fn openai_key_yields_openai_provider() {
        let config = AiConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let provider = build_provider(&config);
        assert!(provider.is_configured());
        assert_eq!(provider.provider_info().name, "openai");
        assert_eq!(provider.provider_info().model, "gpt-3.5-turbo");
    }

    #[test]
    fn gemini_key_yields_gemini_provider() {
        let config = AiConfig {
            provider: ProviderKind::Gemini,
            gemini_api_key: Some("g-test".to_string()),
            ..Default::default()
        };
        let provider = build_provider(&config);
        assert!(provider.is_configured());
        assert_eq!(provider.provider_info().model, "gemini-1.5-flash");
    }
}

//! Tunables shared by the chat handlers.

use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::chat::DEFAULT_HISTORY_WINDOW;

/// Limits and sampling parameters for chat turns.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// History entries sent with each completion request.
    pub history_window: usize,
    /// Longest accepted user message, in characters.
    pub max_message_chars: usize,
    /// Cap on generated tokens per reply.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Overall time budget for one completion.
    pub completion_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            max_message_chars: 1000,
            max_output_tokens: 500,
            temperature: 0.7,
            completion_timeout: Duration::from_secs(20),
        }
    }
}

impl ChatSettings {
    /// Takes the `chat` limits and the `ai` sampling parameters.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            history_window: config.chat.history_window,
            max_message_chars: config.chat.max_message_chars,
            max_output_tokens: config.ai.max_output_tokens,
            temperature: config.ai.temperature,
            completion_timeout: config.ai.timeout(),
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_config_sections() {
        let mut config = AppConfig::default();
        config.chat.history_window = 3;
        config.ai.timeout_secs = 7;

        let settings = ChatSettings::from_config(&config);
        assert_eq!(settings.history_window, 3);
        assert_eq!(settings.completion_timeout, Duration::from_secs(7));
        assert_eq!(settings.max_output_tokens, 500);
    }
}

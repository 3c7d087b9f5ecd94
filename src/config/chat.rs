//! Chat session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session and history limits
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// History entries sent with each completion request
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Longest accepted user message, in characters
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Messages retained per session before the oldest are dropped
    #[serde(default = "default_max_stored_messages")]
    pub max_stored_messages: usize,

    /// Idle time after which a session is swept
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl ChatConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 {
            return Err(ValidationError::MustBePositive("chat.history_window"));
        }
        if self.max_message_chars == 0 {
            return Err(ValidationError::MustBePositive("chat.max_message_chars"));
        }
        if self.max_stored_messages == 0 {
            return Err(ValidationError::MustBePositive("chat.max_stored_messages"));
        }
        if self.session_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("chat.session_ttl_secs"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("chat.sweep_interval_secs"));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_message_chars: default_max_message_chars(),
            max_stored_messages: default_max_stored_messages(),
            session_ttl_secs: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_history_window() -> usize {
    10
}

fn default_max_message_chars() -> usize {
    1000
}

fn default_max_stored_messages() -> usize {
    500
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    3600
}

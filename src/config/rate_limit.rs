//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Limits applied to the chat write endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per client IP within one window
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Sliding window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u32,

    /// Requests allowed across all clients per minute
    #[serde(default = "default_global_requests_per_minute")]
    pub global_requests_per_minute: u32,
}

impl RateLimitConfig {
    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_window == 0 {
            return Err(ValidationError::MustBePositive(
                "rate_limit.requests_per_window",
            ));
        }
        if self.window_secs == 0 {
            return Err(ValidationError::MustBePositive("rate_limit.window_secs"));
        }
        if self.global_requests_per_minute == 0 {
            return Err(ValidationError::MustBePositive(
                "rate_limit.global_requests_per_minute",
            ));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: default_requests_per_window(),
            window_secs: default_window_secs(),
            global_requests_per_minute: default_global_requests_per_minute(),
        }
    }
}

fn default_requests_per_window() -> u32 {
    30
}

fn default_window_secs() -> u32 {
    60
}

fn default_global_requests_per_minute() -> u32 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.requests_per_window, 30);
        assert_eq!(config.window_secs, 60);
        assert_eq!(config.global_requests_per_minute, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let config = RateLimitConfig {
            window_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MustBePositive("rate_limit.window_secs"))
        );
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI timeout (must be 1-300 seconds)")]
    InvalidAiTimeout,

    #[error("Invalid temperature (must be between 0.0 and 2.0)")]
    InvalidTemperature,

    #[error("Invalid max output tokens")]
    InvalidMaxTokens,

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("Invalid base URL for {0}")]
    InvalidBaseUrl(&'static str),
}

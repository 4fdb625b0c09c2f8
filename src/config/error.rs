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
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request body limit must be greater than zero")]
    InvalidBodyLimit,

    #[error("AI timeout must be shorter than the request timeout")]
    AiTimeoutExceedsRequestTimeout,

    #[error("Invalid log format: expected 'pretty' or 'json'")]
    InvalidLogFormat,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool size must be between 1 and 100")]
    InvalidPoolSize,

    #[error("JWT secret must be at least 32 bytes in production")]
    WeakJwtSecret,

    #[error("Anthropic API key is required in production")]
    NoAiProviderConfigured,

    #[error("Invalid AI setting: {0}")]
    InvalidAiSetting(&'static str),

    #[error("Rate limits and window must be greater than zero")]
    InvalidRateLimit,
}

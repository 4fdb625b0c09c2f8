//! Text generation port.
//!
//! The generation service is consumed as `generate(prompt) -> reply`. The
//! reply's text may be available immediately or produced later; see
//! [`GeneratedReply`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::{GeneratedReply, GenerationRequest};

/// Port for the external text generation service.
///
/// Implementations perform exactly one upstream call per invocation.
/// Retry and timeout policies are decorators around this trait.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedReply, AIError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Errors from the generation service transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Provider response did not match its documented envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Transient faults worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(AIError::rate_limited(30).is_retryable());
        assert!(AIError::unavailable("down").is_retryable());
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::parse("bad envelope").is_retryable());
        assert!(!AIError::InvalidRequest("too long".to_string()).is_retryable());
    }

    #[test]
    fn text_generator_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn TextGenerator>();
    }
}

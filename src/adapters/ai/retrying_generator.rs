//! Retry decorator with exponential backoff.
//!
//! Wraps only the generation call, so caller-input failures never reach it.
//! Non-retryable upstream errors are returned immediately.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::generation::{GeneratedReply, GenerationRequest};
use crate::ports::{AIError, TextGenerator};

/// Retries retryable failures of the inner generator.
///
/// Attempt `n` (0-based) is followed by a delay of `base_delay * 2^n`.
pub struct RetryingTextGenerator {
    inner: Arc<dyn TextGenerator>,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryingTextGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[async_trait]
impl TextGenerator for RetryingTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedReply, AIError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(request).await {
                Ok(reply) => return Ok(reply),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        provider = self.inner.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "generation failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;

    fn request() -> GenerationRequest {
        GenerationRequest::new("prompt")
    }

    #[test]
    fn backoff_doubles() {
        let generator = RetryingTextGenerator::new(
            Arc::new(MockTextGenerator::new()),
            3,
            Duration::from_millis(100),
        );
        assert_eq!(generator.backoff(0), Duration::from_millis(100));
        assert_eq!(generator.backoff(1), Duration::from_millis(200));
        assert_eq!(generator.backoff(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let mock = MockTextGenerator::new()
            .with_error(AIError::network("reset"))
            .with_error(AIError::unavailable("503"))
            .with_reply("ok");
        let generator =
            RetryingTextGenerator::new(Arc::new(mock.clone()), 3, Duration::from_millis(1));

        let reply = generator.generate(&request()).await.unwrap();
        assert_eq!(reply.into_text().await.unwrap(), "ok");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let mock = MockTextGenerator::new()
            .with_error(AIError::network("1"))
            .with_error(AIError::network("2"))
            .with_error(AIError::network("3"));
        let generator =
            RetryingTextGenerator::new(Arc::new(mock.clone()), 1, Duration::from_millis(1));

        assert_eq!(
            generator.generate(&request()).await.unwrap_err(),
            AIError::network("2")
        );
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_failures() {
        let mock = MockTextGenerator::new()
            .with_error(AIError::AuthenticationFailed)
            .with_reply("never reached");
        let generator =
            RetryingTextGenerator::new(Arc::new(mock.clone()), 5, Duration::from_millis(1));

        assert_eq!(
            generator.generate(&request()).await.unwrap_err(),
            AIError::AuthenticationFailed
        );
        assert_eq!(mock.call_count(), 1);
    }
}

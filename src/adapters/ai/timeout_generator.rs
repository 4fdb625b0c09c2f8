//! Deadline decorator for generation calls.
//!
//! The inner future is dropped when the deadline passes, which cancels the
//! in-flight upstream request.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::generation::{GeneratedReply, GenerationRequest};
use crate::ports::{AIError, TextGenerator};

pub struct TimeoutTextGenerator {
    inner: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl TimeoutTextGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl TextGenerator for TimeoutTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedReply, AIError> {
        match tokio::time::timeout(self.timeout, self.inner.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    provider = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "generation call exceeded deadline"
                );
                Err(AIError::Timeout {
                    timeout_secs: u32::try_from(self.timeout.as_secs()).unwrap_or(u32::MAX),
                })
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

    #[tokio::test]
    async fn slow_generation_times_out() {
        let mock = MockTextGenerator::new()
            .with_reply("late")
            .with_delay(Duration::from_millis(500));
        let generator = TimeoutTextGenerator::new(Arc::new(mock), Duration::from_millis(20));

        let err = generator
            .generate(&GenerationRequest::new("p"))
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Timeout { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn fast_generation_passes_through() {
        let mock = MockTextGenerator::new().with_reply("on time");
        let generator = TimeoutTextGenerator::new(Arc::new(mock), Duration::from_secs(5));

        let reply = generator.generate(&GenerationRequest::new("p")).await.unwrap();
        assert_eq!(reply.into_text().await.unwrap(), "on time");
    }
}

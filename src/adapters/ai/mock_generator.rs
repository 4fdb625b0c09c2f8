//! Mock text generator for testing.
//!
//! # Features
//!
//! - Queued replies in plain, deferred or empty form
//! - Error injection for resilience testing
//! - Simulated delays for timeout testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_reply(r#"{"questions": []}"#)
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::generation::{DeferredText, GeneratedReply, GenerationRequest};
use crate::ports::{AIError, TextGenerator};

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Text available with the reply.
    Plain(String),
    /// Text produced by a deferred producer.
    Deferred(String),
    /// A reply that carries no text.
    Empty,
    Error(AIError),
}

/// Configurable generator that never leaves the process.
#[derive(Debug, Clone, Default)]
pub struct MockTextGenerator {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a plain-text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_mock_reply(MockReply::Plain(text.into()))
    }

    /// Queues a reply whose text is produced lazily.
    pub fn with_deferred_reply(self, text: impl Into<String>) -> Self {
        self.with_mock_reply(MockReply::Deferred(text.into()))
    }

    pub fn with_empty_reply(self) -> Self {
        self.with_mock_reply(MockReply::Empty)
    }

    pub fn with_error(self, error: AIError) -> Self {
        self.with_mock_reply(MockReply::Error(error))
    }

    pub fn with_mock_reply(self, reply: MockReply) -> Self {
        locked(&self.replies).push_back(reply);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        locked(&self.calls).clone()
    }

    /// Next queued reply; an exhausted queue replies with an empty JSON object.
    fn next_reply(&self) -> MockReply {
        locked(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Plain("{}".to_string()))
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedReply, AIError> {
        locked(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let reply = match self.next_reply() {
            MockReply::Plain(text) => GeneratedReply::plain(text),
            MockReply::Deferred(text) => {
                GeneratedReply::deferred(DeferredText::new(move || async move { Some(text) }))
            }
            MockReply::Empty => GeneratedReply::empty(),
            MockReply::Error(err) => return Err(err),
        };
        Ok(reply.with_model("mock-model-1"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::GenerationError;

    fn request() -> GenerationRequest {
        GenerationRequest::new("prompt")
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let generator = MockTextGenerator::new()
            .with_reply("first")
            .with_deferred_reply("second");

        let first = generator.generate(&request()).await.unwrap();
        assert_eq!(first.into_text().await.unwrap(), "first");
        let second = generator.generate(&request()).await.unwrap();
        assert_eq!(second.into_text().await.unwrap(), "second");
        let fallback = generator.generate(&request()).await.unwrap();
        assert_eq!(fallback.into_text().await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn empty_reply_has_no_text() {
        let generator = MockTextGenerator::new().with_empty_reply();
        let reply = generator.generate(&request()).await.unwrap();
        assert!(matches!(
            reply.into_text().await,
            Err(GenerationError::NoTextInReply)
        ));
    }

    #[tokio::test]
    async fn errors_are_returned() {
        let generator = MockTextGenerator::new().with_error(AIError::AuthenticationFailed);
        assert_eq!(
            generator.generate(&request()).await.unwrap_err(),
            AIError::AuthenticationFailed
        );
    }

    #[tokio::test]
    async fn calls_are_recorded_across_clones() {
        let generator = MockTextGenerator::new();
        let clone = generator.clone();
        clone.generate(&GenerationRequest::new("hello")).await.unwrap();
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.get_calls()[0].prompt, "hello");
    }
}

//! Text-bearing replies from the generation service.
//!
//! A reply's text either arrives with the reply or is produced later by a
//! zero-argument async producer. Both shapes implement [`ReplyText`] and are
//! resolved the same way.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;

use super::GenerationError;

/// Capability that yields the reply text once.
#[async_trait]
pub trait ReplyText: Send {
    /// Produces the text, or `None` when the reply carried none.
    async fn resolve(self: Box<Self>) -> Option<String>;
}

/// Text that is already available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText(pub String);

#[async_trait]
impl ReplyText for PlainText {
    async fn resolve(self: Box<Self>) -> Option<String> {
        Some(self.0)
    }
}

type Producer = Box<dyn FnOnce() -> BoxFuture<'static, Option<String>> + Send>;

/// Text produced on demand by an async callable.
pub struct DeferredText {
    producer: Producer,
}

impl DeferredText {
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self {
            producer: Box::new(move || producer().boxed()),
        }
    }
}

impl fmt::Debug for DeferredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredText").finish_non_exhaustive()
    }
}

#[async_trait]
impl ReplyText for DeferredText {
    async fn resolve(self: Box<Self>) -> Option<String> {
        (self.producer)().await
    }
}

/// A reply from the generation service whose text is not yet resolved.
pub struct GeneratedReply {
    text: Box<dyn ReplyText>,
    /// Model that produced the reply, when the service reports it.
    pub model: Option<String>,
}

impl GeneratedReply {
    pub fn new(text: Box<dyn ReplyText>) -> Self {
        Self { text, model: None }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Box::new(PlainText(text.into())))
    }

    pub fn deferred(text: DeferredText) -> Self {
        Self::new(Box::new(text))
    }

    /// A reply that carried no text at all.
    pub fn empty() -> Self {
        Self::deferred(DeferredText::new(|| async { None }))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Resolves the reply to its raw text.
    ///
    /// Missing or whitespace-only text is `NoTextInReply`.
    pub async fn into_text(self) -> Result<String, GenerationError> {
        match self.text.resolve().await {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::NoTextInReply),
        }
    }
}

impl fmt::Debug for GeneratedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedReply")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

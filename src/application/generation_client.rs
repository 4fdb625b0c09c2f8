//! Generation client wrapper.
//!
//! Builds the prompt, calls the configured [`TextGenerator`] once and
//! resolves the reply to plain text. Parsing the text is left to
//! [`reply_interpreter`](super::reply_interpreter).

use std::sync::Arc;

use crate::domain::generation::{
    answer_feedback_prompt, feedback_prompt, questions_prompt, GenerationError, GenerationRequest,
};
use crate::ports::TextGenerator;

#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationClient {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Raw reply text for an interview question set.
    pub async fn generate_questions(
        &self,
        role: &str,
        stack: &str,
        years: u32,
    ) -> Result<String, GenerationError> {
        self.run(questions_prompt(role, stack, years)).await
    }

    /// Raw reply text for feedback on free-form text.
    pub async fn generate_feedback(&self, prompt: &str) -> Result<String, GenerationError> {
        self.run(feedback_prompt(prompt)).await
    }

    /// Raw reply text for feedback on an answer to a known question.
    pub async fn generate_answer_feedback(
        &self,
        question: &str,
        reference_answer: &str,
        user_answer: &str,
    ) -> Result<String, GenerationError> {
        self.run(answer_feedback_prompt(question, reference_answer, user_answer))
            .await
    }

    async fn run(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        tracing::debug!(
            generator = self.generator.name(),
            prompt_chars = request.prompt.chars().count(),
            "calling text generator"
        );

        let reply = self.generator.generate(&request).await.map_err(|err| {
            tracing::error!(generator = self.generator.name(), error = %err, "text generation failed");
            GenerationError::from(err)
        })?;
        let model = reply.model.clone();

        let text = reply.into_text().await.map_err(|err| {
            tracing::warn!(generator = self.generator.name(), model = ?model, "reply carried no text");
            err
        })?;
        tracing::debug!(model = ?model, reply_chars = text.chars().count(), "reply received");
        Ok(text)
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("generator", &self.generator.name())
            .finish()
    }
}

//! GenerateQuestionsHandler - creates a mock interview from a job description.

use std::sync::Arc;

use crate::application::errors::PipelineError;
use crate::application::gate::{accept_body, RateLimitedResource, RequestBody, RequestGate};
use crate::application::generation_client::GenerationClient;
use crate::application::reply_interpreter::interpret_questions;
use crate::domain::foundation::MockId;
use crate::domain::generation::NormalizedQuestionSet;
use crate::domain::interview::MockInterview;
use crate::domain::validation::{JOB_DESC, JOB_EXPERIENCE, JOB_POSITION, QUESTIONS_SCHEMA};
use crate::ports::InterviewRepository;

use super::{required_number, required_text, Processed};

/// Raw request for question generation.
#[derive(Debug, Clone)]
pub struct GenerateQuestionsCommand {
    pub authorization: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct GenerateQuestionsResult {
    pub mock_id: MockId,
    pub questions: NormalizedQuestionSet,
}

pub struct GenerateQuestionsHandler {
    gate: RequestGate,
    client: GenerationClient,
    interviews: Arc<dyn InterviewRepository>,
}

impl GenerateQuestionsHandler {
    pub fn new(
        gate: RequestGate,
        client: GenerationClient,
        interviews: Arc<dyn InterviewRepository>,
    ) -> Self {
        Self {
            gate,
            client,
            interviews,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateQuestionsCommand,
    ) -> Result<Processed<GenerateQuestionsResult>, PipelineError> {
        let admission = self
            .gate
            .admit(cmd.authorization.as_deref(), RateLimitedResource::Questions)
            .await?;
        let fields = accept_body(cmd.body.bytes()?, &QUESTIONS_SCHEMA)?;

        let job_position = required_text(&fields, JOB_POSITION)?;
        let job_desc = required_text(&fields, JOB_DESC)?;
        // Bounded to 0..=50 by the schema; fractional years are dropped.
        let job_experience = required_number(&fields, JOB_EXPERIENCE)?.trunc() as u32;

        let raw = self
            .client
            .generate_questions(&job_position, &job_desc, job_experience)
            .await?;
        let questions = interpret_questions(&raw)?;

        let interview = MockInterview::new(
            job_position,
            job_desc,
            job_experience,
            questions,
            admission.user.id.clone(),
        );
        let mock_id = self.interviews.insert(&interview).await?;
        tracing::info!(
            mock_id = %mock_id,
            user_id = %admission.user.id,
            questions = interview.questions.len(),
            "mock interview created"
        );

        Ok(Processed::new(
            GenerateQuestionsResult {
                mock_id,
                questions: interview.questions,
            },
            admission.rate,
        ))
    }
}

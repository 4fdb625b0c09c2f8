//! ListAnswersHandler - lists the caller's stored answers for one interview.

use std::str::FromStr;
use std::sync::Arc;

use crate::application::errors::PipelineError;
use crate::application::gate::{RateLimitedResource, RequestGate};
use crate::domain::foundation::MockId;
use crate::domain::interview::{AnswerFilter, AnswerRecord};
use crate::domain::validation::{FieldError, ValidationCode};
use crate::ports::AnswerRepository;

use super::Processed;

const MOCK_ID_PARAM: &str = "mockId";

#[derive(Debug, Clone)]
pub struct ListAnswersQuery {
    pub authorization: Option<String>,
    pub mock_id: String,
}

pub struct ListAnswersHandler {
    gate: RequestGate,
    answers: Arc<dyn AnswerRepository>,
}

impl ListAnswersHandler {
    pub fn new(gate: RequestGate, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { gate, answers }
    }

    /// Answers oldest first. Interviews of other users yield an empty list.
    pub async fn handle(
        &self,
        query: ListAnswersQuery,
    ) -> Result<Processed<Vec<AnswerRecord>>, PipelineError> {
        let admission = self
            .gate
            .admit(query.authorization.as_deref(), RateLimitedResource::Reads)
            .await?;

        let mock_id = MockId::from_str(query.mock_id.trim()).map_err(|_| {
            PipelineError::FieldValidationFailed(vec![FieldError::new(
                MOCK_ID_PARAM,
                format!("{MOCK_ID_PARAM} has an invalid format"),
                ValidationCode::PatternError,
            )])
        })?;

        let answers = self
            .answers
            .select(&AnswerFilter::owned(mock_id, admission.user.id.clone()))
            .await?;
        Ok(Processed::new(answers, admission.rate))
    }
}

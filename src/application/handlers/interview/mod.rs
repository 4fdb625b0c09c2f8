//! Mock interview pipeline handlers.
//!
//! Each handler takes the raw `Authorization` value and body bytes so the
//! gate can run its stages in order: auth and rate limiting happen before
//! the body is even parsed.

mod generate_feedback;
mod generate_questions;
mod list_answers;

pub use generate_feedback::{GenerateFeedbackCommand, GenerateFeedbackHandler, GenerateFeedbackResult};
pub use generate_questions::{
    GenerateQuestionsCommand, GenerateQuestionsHandler, GenerateQuestionsResult,
};
pub use list_answers::{ListAnswersHandler, ListAnswersQuery};

use crate::application::errors::PipelineError;
use crate::domain::security::RateDecision;
use crate::domain::validation::ValidatedFields;

/// Handler output paired with the caller's rate decision.
#[derive(Debug, Clone)]
pub struct Processed<T> {
    pub data: T,
    pub rate: RateDecision,
}

impl<T> Processed<T> {
    pub fn new(data: T, rate: RateDecision) -> Self {
        Self { data, rate }
    }
}

// Validated required fields are always present; a miss is a schema bug.
fn required_text(fields: &ValidatedFields, name: &str) -> Result<String, PipelineError> {
    fields
        .text(name)
        .map(str::to_string)
        .ok_or_else(|| PipelineError::internal(format!("validated field {name} missing")))
}

fn required_number(fields: &ValidatedFields, name: &str) -> Result<f64, PipelineError> {
    fields
        .number(name)
        .ok_or_else(|| PipelineError::internal(format!("validated field {name} missing")))
}

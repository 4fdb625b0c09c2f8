//! Turns raw reply text into one of the known payload shapes.
//!
//! Extraction and normalization failures are logged here with their
//! diagnostic detail; the returned [`PipelineError`] carries only what the
//! response builder needs.

use crate::application::errors::PipelineError;
use crate::domain::generation::{
    extract_json, normalize_feedback, normalize_question_set, Extracted, ExtractionError,
    NormalizedFeedback, NormalizedQuestionSet, PREVIEW_CHARS,
};

pub fn interpret_questions(raw: &str) -> Result<NormalizedQuestionSet, PipelineError> {
    let extracted = extract(raw)?;
    normalize_question_set(extracted.value).map_err(|err| {
        tracing::warn!(reason = %err, preview = %preview(raw), "question set rejected");
        PipelineError::from(err)
    })
}

pub fn interpret_feedback(raw: &str) -> Result<NormalizedFeedback, PipelineError> {
    let extracted = extract(raw)?;
    normalize_feedback(extracted.value).map_err(|err| {
        tracing::warn!(reason = %err, preview = %preview(raw), "feedback rejected");
        PipelineError::from(err)
    })
}

fn extract(raw: &str) -> Result<Extracted, PipelineError> {
    match extract_json(raw) {
        Ok(extracted) => {
            tracing::debug!(strategy = ?extracted.strategy, "extracted JSON from reply");
            Ok(extracted)
        }
        Err(err) => {
            let ExtractionError::ExtractionFailed { preview } = &err;
            tracing::warn!(preview = %preview, "no JSON found in reply");
            Err(err.into())
        }
    }
}

fn preview(raw: &str) -> String {
    raw.chars().take(PREVIEW_CHARS).collect()
}

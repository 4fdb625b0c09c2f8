//! Prompt construction and interpretation of generation replies.

mod errors;
mod extractor;
mod normalizer;
mod prompt;
mod reply;

pub use errors::GenerationError;
pub use extractor::{extract_json, Extracted, ExtractionError, ExtractionStrategy, PREVIEW_CHARS};
pub use normalizer::{
    normalize_feedback, normalize_question_set, GeneratedPayload, NormalizeError,
    NormalizedFeedback, NormalizedQuestionSet, QuestionAnswer, MAX_QUESTIONS,
};
pub use prompt::{
    answer_feedback_prompt, feedback_prompt, questions_prompt, questions_prompt_with_count,
    GenerationRequest, DEFAULT_QUESTION_COUNT,
};
pub use reply::{DeferredText, GeneratedReply, PlainText, ReplyText};

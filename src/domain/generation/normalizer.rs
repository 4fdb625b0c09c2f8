//! Validation and coercion of extracted JSON into the two known reply shapes.
//!
//! The shape is decided structurally by [`GeneratedPayload::classify`]; there
//! is no type tag in the reply. Every string kept from a reply is sanitized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::security::{sanitize, sanitize_value};

/// Keys accepted for the question list, in lookup order.
pub const QUESTION_KEYS: [&str; 2] = ["questions", "interviewQuestions"];

pub const MAX_QUESTIONS: usize = 20;
pub const MAX_QUESTION_TEXT_LENGTH: usize = 2000;
pub const MAX_FEEDBACK_LENGTH: usize = 5000;
pub const MAX_LIST_ITEM_LENGTH: usize = 500;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Non-empty list of sanitized question/answer pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestionSet {
    pub questions: Vec<QuestionAnswer>,
}

impl NormalizedQuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionAnswer> {
        self.questions.get(index)
    }
}

/// Sanitized evaluation of an answer, rating clamped to 1..=10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFeedback {
    pub rating: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("reply structure invalid: {reason}")]
    StructureInvalid { reason: String },
}

impl NormalizeError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::StructureInvalid {
            reason: reason.into(),
        }
    }
}

/// Extracted JSON discriminated by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedPayload {
    /// Candidate question elements, not yet checked.
    QuestionSet(Vec<Value>),
    /// Object carrying `rating` and/or `feedback`.
    Feedback(Map<String, Value>),
    Unrecognized(Value),
}

impl GeneratedPayload {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => GeneratedPayload::QuestionSet(items),
            Value::Object(mut map) => {
                for key in QUESTION_KEYS {
                    if let Some(Value::Array(_)) = map.get(key) {
                        if let Some(Value::Array(items)) = map.remove(key) {
                            return GeneratedPayload::QuestionSet(items);
                        }
                    }
                }
                if map.contains_key("rating") || map.contains_key("feedback") {
                    GeneratedPayload::Feedback(map)
                } else {
                    GeneratedPayload::Unrecognized(Value::Object(map))
                }
            }
            other => GeneratedPayload::Unrecognized(other),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            GeneratedPayload::QuestionSet(_) => "a question set",
            GeneratedPayload::Feedback(_) => "a feedback object",
            GeneratedPayload::Unrecognized(Value::Object(_)) => "an object with no recognized keys",
            GeneratedPayload::Unrecognized(_) => "a non-object value",
        }
    }
}

/// Normalizes an extracted value into a question set.
pub fn normalize_question_set(value: Value) -> Result<NormalizedQuestionSet, NormalizeError> {
    let items = match GeneratedPayload::classify(value) {
        GeneratedPayload::QuestionSet(items) => items,
        other => {
            return Err(NormalizeError::invalid(format!(
                "expected a question set, found {}",
                other.describe()
            )))
        }
    };

    let questions: Vec<QuestionAnswer> = items
        .iter()
        .filter_map(question_answer)
        .take(MAX_QUESTIONS)
        .collect();

    if questions.is_empty() {
        return Err(NormalizeError::invalid(
            "question set contains no usable question/answer pairs",
        ));
    }

    Ok(NormalizedQuestionSet { questions })
}

/// Normalizes an extracted value into feedback.
pub fn normalize_feedback(value: Value) -> Result<NormalizedFeedback, NormalizeError> {
    let map = match GeneratedPayload::classify(value) {
        GeneratedPayload::Feedback(map) => map,
        other => {
            return Err(NormalizeError::invalid(format!(
                "expected feedback, found {}",
                other.describe()
            )))
        }
    };

    let rating = map
        .get("rating")
        .and_then(coerce_rating)
        .ok_or_else(|| NormalizeError::invalid("feedback rating missing or not numeric"))?;

    let feedback = match map.get("feedback") {
        Some(Value::String(text)) => sanitize(text, Some(MAX_FEEDBACK_LENGTH)),
        _ => return Err(NormalizeError::invalid("feedback text missing or not a string")),
    };
    if feedback.is_empty() {
        return Err(NormalizeError::invalid("feedback text empty after sanitization"));
    }

    Ok(NormalizedFeedback {
        rating,
        feedback,
        strengths: string_list(map.get("strengths")),
        improvements: string_list(map.get("improvements")),
    })
}

fn question_answer(item: &Value) -> Option<QuestionAnswer> {
    let question = sanitize_value(item.get("question")?, Some(MAX_QUESTION_TEXT_LENGTH));
    let answer = sanitize_value(item.get("answer")?, Some(MAX_QUESTION_TEXT_LENGTH));
    (!question.is_empty() && !answer.is_empty()).then_some(QuestionAnswer { question, answer })
}

fn coerce_rating(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    let clamped = raw.round().clamp(f64::from(MIN_RATING), f64::from(MAX_RATING));
    Some(clamped as u8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(|item| sanitize(item, Some(MAX_LIST_ITEM_LENGTH)))
        .filter(|item| !item.is_empty())
        .collect()
}

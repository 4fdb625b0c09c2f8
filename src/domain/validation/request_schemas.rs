//! Schemas for the inbound request shapes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{FieldSchema, RequestSchema};

pub const JOB_POSITION: &str = "jobPosition";
pub const JOB_DESC: &str = "jobDesc";
pub const JOB_EXPERIENCE: &str = "jobExperience";
pub const PROMPT: &str = "prompt";
pub const MOCK_ID_REF: &str = "mockIdRef";
pub const USER_ANSWER: &str = "userAnswer";
pub const QUESTION_INDEX: &str = "questionIndex";

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

/// `{jobPosition, jobDesc, jobExperience}` for question generation.
pub static QUESTIONS_SCHEMA: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new()
        .field(
            JOB_POSITION,
            FieldSchema::string().required().min_length(2).max_length(100),
        )
        .field(
            JOB_DESC,
            FieldSchema::string().required().min_length(10).max_length(1000),
        )
        .field(
            JOB_EXPERIENCE,
            FieldSchema::number().required().min(0.0).max(50.0),
        )
});

/// `{prompt}` for free-form feedback generation.
pub static PROMPT_FEEDBACK_SCHEMA: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new().field(
        PROMPT,
        FieldSchema::string().required().min_length(10).max_length(5000),
    )
});

/// `{mockIdRef, userAnswer, questionIndex?}` for answer feedback.
pub static ANSWER_FEEDBACK_SCHEMA: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new()
        .field(
            MOCK_ID_REF,
            FieldSchema::string().required().pattern(UUID_PATTERN.clone()),
        )
        .field(
            USER_ANSWER,
            FieldSchema::string().required().min_length(1).max_length(5000),
        )
        .field(QUESTION_INDEX, FieldSchema::number().min(0.0).max(49.0))
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{validate, ValidationCode};
    use serde_json::json;

    #[test]
    fn backend_engineer_with_short_description() {
        let body = json!({"jobPosition": "Backend Engineer", "jobDesc": "Node", "jobExperience": 3});
        let outcome = validate(&body, &QUESTIONS_SCHEMA);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, JOB_DESC);
        assert!(outcome.errors.iter().all(|e| e.field != JOB_POSITION));
    }

    #[test]
    fn questions_schema_accepts_string_experience() {
        let body = json!({
            "jobPosition": "Backend Engineer",
            "jobDesc": "Rust, Postgres, Kubernetes",
            "jobExperience": "4"
        });
        let outcome = validate(&body, &QUESTIONS_SCHEMA);
        assert!(outcome.valid);
        assert_eq!(outcome.data.unwrap().number(JOB_EXPERIENCE), Some(4.0));
    }

    #[test]
    fn answer_schema_requires_uuid_reference() {
        let body = json!({"mockIdRef": "abc", "userAnswer": "My answer"});
        let outcome = validate(&body, &ANSWER_FEEDBACK_SCHEMA);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, ValidationCode::PatternError);
    }

    #[test]
    fn answer_schema_question_index_is_optional() {
        let body = json!({
            "mockIdRef": "6f1c2a7e-1b9a-4a55-9a53-0e0f9a6f2b11",
            "userAnswer": "I would use a queue"
        });
        assert!(validate(&body, &ANSWER_FEEDBACK_SCHEMA).valid);
    }

    #[test]
    fn prompt_schema_enforces_minimum() {
        let outcome = validate(&json!({"prompt": "short"}), &PROMPT_FEEDBACK_SCHEMA);
        assert_eq!(outcome.errors[0].code, ValidationCode::MinLengthError);
    }

    #[test]
    fn mock_id_ref_must_be_uuid_shaped() {
        let outcome = validate(
            &json!({"mockIdRef": "6f1c2a7e", "userAnswer": "I would use a queue"}),
            &ANSWER_FEEDBACK_SCHEMA,
        );
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, MOCK_ID_REF);
        assert_eq!(outcome.errors[0].code, ValidationCode::PatternError);
    }
}

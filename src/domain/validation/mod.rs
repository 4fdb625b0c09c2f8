//! Schema validation for inbound request bodies.

mod request_schemas;
mod schema;
mod validator;

pub use request_schemas::{
    ANSWER_FEEDBACK_SCHEMA, JOB_DESC, JOB_EXPERIENCE, JOB_POSITION, MOCK_ID_REF,
    PROMPT, PROMPT_FEEDBACK_SCHEMA, QUESTIONS_SCHEMA, QUESTION_INDEX, USER_ANSWER,
};
pub use schema::{FieldSchema, FieldType, RequestSchema};
pub use validator::{
    validate, FieldError, FieldValue, ValidatedFields, ValidationCode, ValidationOutcome,
};

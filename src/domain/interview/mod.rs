//! Mock interview records and their selection filters.

mod records;

pub use records::{AnswerFilter, AnswerRecord, InterviewFilter, MockInterview};

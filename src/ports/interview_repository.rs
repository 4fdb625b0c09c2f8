//! Persistence ports for interviews and answers.
//!
//! The store is consumed through two operations per record type:
//! `insert(record) -> id` and `select(filter) -> records`. No transactions.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{AnswerId, MockId};
use crate::domain::interview::{AnswerFilter, AnswerRecord, InterviewFilter, MockInterview};

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn insert(&self, interview: &MockInterview) -> Result<MockId, RepositoryError>;

    /// Interviews matching `filter`, newest first.
    async fn select(&self, filter: &InterviewFilter) -> Result<Vec<MockInterview>, RepositoryError>;
}

#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn insert(&self, answer: &AnswerRecord) -> Result<AnswerId, RepositoryError>;

    /// Answers matching `filter`, oldest first.
    async fn select(&self, filter: &AnswerFilter) -> Result<Vec<AnswerRecord>, RepositoryError>;
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("stored record could not be decoded: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repositories_are_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn InterviewRepository>();
        assert_send_sync::<dyn AnswerRepository>();
    }
}

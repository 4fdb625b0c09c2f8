//! In-memory interview and answer repositories.
//!
//! Used when no database URL is configured and throughout the test suite.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AnswerId, MockId};
use crate::domain::interview::{AnswerFilter, AnswerRecord, InterviewFilter, MockInterview};
use crate::ports::{AnswerRepository, InterviewRepository, RepositoryError};

/// Interviews kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInterviewRepository {
    interviews: Arc<RwLock<Vec<MockInterview>>>,
}

impl InMemoryInterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.interviews.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.interviews.read().await.is_empty()
    }
}

#[async_trait]
impl InterviewRepository for InMemoryInterviewRepository {
    async fn insert(&self, interview: &MockInterview) -> Result<MockId, RepositoryError> {
        let mut interviews = self.interviews.write().await;
        if interviews.iter().any(|i| i.mock_id == interview.mock_id) {
            return Err(RepositoryError::Duplicate(interview.mock_id.to_string()));
        }
        interviews.push(interview.clone());
        Ok(interview.mock_id)
    }

    async fn select(&self, filter: &InterviewFilter) -> Result<Vec<MockInterview>, RepositoryError> {
        Ok(self
            .interviews
            .read()
            .await
            .iter()
            .rev()
            .filter(|interview| filter.matches(interview))
            .cloned()
            .collect())
    }
}

/// Answers kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnswerRepository {
    answers: Arc<RwLock<Vec<AnswerRecord>>>,
}

impl InMemoryAnswerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.answers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.answers.read().await.is_empty()
    }
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn insert(&self, answer: &AnswerRecord) -> Result<AnswerId, RepositoryError> {
        let mut answers = self.answers.write().await;
        if answers.iter().any(|a| a.id == answer.id) {
            return Err(RepositoryError::Duplicate(answer.id.to_string()));
        }
        answers.push(answer.clone());
        Ok(answer.id)
    }

    async fn select(&self, filter: &AnswerFilter) -> Result<Vec<AnswerRecord>, RepositoryError> {
        Ok(self
            .answers
            .read()
            .await
            .iter()
            .filter(|answer| filter.matches(answer))
            .cloned()
            .collect())
    }
}

//! Persisted records of the mock interview flow.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnswerId, MockId, Timestamp, UserId};
use crate::domain::generation::{NormalizedFeedback, NormalizedQuestionSet, QuestionAnswer};

/// A generated mock interview owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInterview {
    pub mock_id: MockId,
    pub job_position: String,
    pub job_desc: String,
    pub job_experience: u32,
    pub questions: NormalizedQuestionSet,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl MockInterview {
    pub fn new(
        job_position: String,
        job_desc: String,
        job_experience: u32,
        questions: NormalizedQuestionSet,
        created_by: UserId,
    ) -> Self {
        Self {
            mock_id: MockId::new(),
            job_position,
            job_desc,
            job_experience,
            questions,
            created_by,
            created_at: Timestamp::now(),
        }
    }

    pub fn question(&self, index: usize) -> Option<&QuestionAnswer> {
        self.questions.get(index)
    }
}

/// A user's answer to one interview question with its generated feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub mock_id_ref: MockId,
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
    pub rating: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl AnswerRecord {
    pub fn new(
        interview: &MockInterview,
        question: &QuestionAnswer,
        user_answer: String,
        feedback: NormalizedFeedback,
        created_by: UserId,
    ) -> Self {
        Self {
            id: AnswerId::new(),
            mock_id_ref: interview.mock_id,
            question: question.question.clone(),
            correct_answer: question.answer.clone(),
            user_answer,
            rating: feedback.rating,
            feedback: feedback.feedback,
            strengths: feedback.strengths,
            improvements: feedback.improvements,
            created_by,
            created_at: Timestamp::now(),
        }
    }
}

/// Selection criteria for interviews. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewFilter {
    pub mock_id: Option<MockId>,
    pub created_by: Option<UserId>,
}

impl InterviewFilter {
    pub fn owned(mock_id: MockId, created_by: UserId) -> Self {
        Self {
            mock_id: Some(mock_id),
            created_by: Some(created_by),
        }
    }

    pub fn matches(&self, interview: &MockInterview) -> bool {
        self.mock_id.map_or(true, |id| id == interview.mock_id)
            && self
                .created_by
                .as_ref()
                .map_or(true, |user| *user == interview.created_by)
    }
}

/// Selection criteria for answers. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerFilter {
    pub mock_id_ref: Option<MockId>,
    pub created_by: Option<UserId>,
}

impl AnswerFilter {
    pub fn owned(mock_id_ref: MockId, created_by: UserId) -> Self {
        Self {
            mock_id_ref: Some(mock_id_ref),
            created_by: Some(created_by),
        }
    }

    pub fn matches(&self, answer: &AnswerRecord) -> bool {
        self.mock_id_ref.map_or(true, |id| id == answer.mock_id_ref)
            && self
                .created_by
                .as_ref()
                .map_or(true, |user| *user == answer.created_by)
    }
}

//! HTTP DTOs for mock interview endpoints.

use serde::Serialize;

use crate::application::{GenerateFeedbackResult, GenerateQuestionsResult};
use crate::domain::generation::QuestionAnswer;
use crate::domain::interview::AnswerRecord;

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub question: String,
    pub answer: String,
}

impl From<QuestionAnswer> for QuestionResponse {
    fn from(qa: QuestionAnswer) -> Self {
        Self {
            question: qa.question,
            answer: qa.answer,
        }
    }
}

/// `POST /api/interviews` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewCreatedResponse {
    pub mock_id: String,
    pub questions: Vec<QuestionResponse>,
}

impl From<GenerateQuestionsResult> for InterviewCreatedResponse {
    fn from(result: GenerateQuestionsResult) -> Self {
        Self {
            mock_id: result.mock_id.to_string(),
            questions: result
                .questions
                .questions
                .into_iter()
                .map(QuestionResponse::from)
                .collect(),
        }
    }
}

/// `POST /api/feedback` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,
    pub rating: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl From<GenerateFeedbackResult> for FeedbackResponse {
    fn from(result: GenerateFeedbackResult) -> Self {
        Self {
            answer_id: result.answer_id.map(|id| id.to_string()),
            rating: result.feedback.rating,
            feedback: result.feedback.feedback,
            strengths: result.feedback.strengths,
            improvements: result.feedback.improvements,
        }
    }
}

/// One stored answer in `GET /api/interviews/:mockId/answers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: String,
    pub mock_id_ref: String,
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
    pub rating: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub created_at: String,
}

impl From<AnswerRecord> for AnswerResponse {
    fn from(record: AnswerRecord) -> Self {
        Self {
            id: record.id.to_string(),
            mock_id_ref: record.mock_id_ref.to_string(),
            question: record.question,
            correct_answer: record.correct_answer,
            user_answer: record.user_answer,
            rating: record.rating,
            feedback: record.feedback,
            strengths: record.strengths,
            improvements: record.improvements,
            created_at: record.created_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AnswerId;
    use crate::domain::generation::NormalizedFeedback;

    #[test]
    fn prompt_feedback_omits_answer_id() {
        let response = FeedbackResponse::from(GenerateFeedbackResult {
            answer_id: None,
            feedback: NormalizedFeedback {
                rating: 4,
                feedback: "Thin".to_string(),
                strengths: vec![],
                improvements: vec!["depth".to_string()],
            },
        });
        let json = serde_json::to_value(response).unwrap();
        assert!(json.get("answerId").is_none());
        assert_eq!(json["improvements"][0], "depth");
    }

    #[test]
    fn stored_feedback_uses_camel_case() {
        let id = AnswerId::new();
        let response = FeedbackResponse::from(GenerateFeedbackResult {
            answer_id: Some(id),
            feedback: NormalizedFeedback {
                rating: 9,
                feedback: "Great".to_string(),
                strengths: vec![],
                improvements: vec![],
            },
        });
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["answerId"], id.to_string());
    }
}

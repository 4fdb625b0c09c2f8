//! GenerateFeedbackHandler - evaluates free text or an answer to a stored question.
//!
//! The body shape picks the path: a body carrying `prompt` is evaluated as
//! free text and nothing is stored. Any other body must reference one of
//! the caller's interviews via `mockIdRef`; the evaluation is then stored
//! as an [`AnswerRecord`].

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::application::errors::PipelineError;
use crate::application::gate::{
    parse_body, sanitize_fields, validate_fields, RateLimitedResource, RequestBody, RequestGate,
};
use crate::application::generation_client::GenerationClient;
use crate::application::reply_interpreter::interpret_feedback;
use crate::domain::foundation::{AnswerId, AuthenticatedUser, MockId};
use crate::domain::generation::NormalizedFeedback;
use crate::domain::interview::{AnswerRecord, InterviewFilter};
use crate::domain::validation::{
    FieldError, ValidatedFields, ValidationCode, ANSWER_FEEDBACK_SCHEMA, MOCK_ID_REF, PROMPT,
    PROMPT_FEEDBACK_SCHEMA, QUESTION_INDEX, USER_ANSWER,
};
use crate::ports::{AnswerRepository, InterviewRepository};

use super::{required_text, Processed};

/// Raw request for feedback generation.
#[derive(Debug, Clone)]
pub struct GenerateFeedbackCommand {
    pub authorization: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct GenerateFeedbackResult {
    /// Set when the feedback was stored against an interview question.
    pub answer_id: Option<AnswerId>,
    pub feedback: NormalizedFeedback,
}

pub struct GenerateFeedbackHandler {
    gate: RequestGate,
    client: GenerationClient,
    interviews: Arc<dyn InterviewRepository>,
    answers: Arc<dyn AnswerRepository>,
}

impl GenerateFeedbackHandler {
    pub fn new(
        gate: RequestGate,
        client: GenerationClient,
        interviews: Arc<dyn InterviewRepository>,
        answers: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            gate,
            client,
            interviews,
            answers,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateFeedbackCommand,
    ) -> Result<Processed<GenerateFeedbackResult>, PipelineError> {
        let admission = self
            .gate
            .admit(cmd.authorization.as_deref(), RateLimitedResource::Feedback)
            .await?;
        let body = parse_body(cmd.body.bytes()?)?;

        let result = if body.get(PROMPT).is_some() {
            self.prompt_feedback(&body).await?
        } else {
            self.answer_feedback(&body, &admission.user).await?
        };
        Ok(Processed::new(result, admission.rate))
    }

    async fn prompt_feedback(&self, body: &Value) -> Result<GenerateFeedbackResult, PipelineError> {
        let fields = validate_fields(body, &PROMPT_FEEDBACK_SCHEMA)?;
        let fields = sanitize_fields(fields, &PROMPT_FEEDBACK_SCHEMA)?;
        let prompt = required_text(&fields, PROMPT)?;

        let raw = self.client.generate_feedback(&prompt).await?;
        let feedback = interpret_feedback(&raw)?;
        Ok(GenerateFeedbackResult {
            answer_id: None,
            feedback,
        })
    }

    async fn answer_feedback(
        &self,
        body: &Value,
        user: &AuthenticatedUser,
    ) -> Result<GenerateFeedbackResult, PipelineError> {
        let fields = validate_fields(body, &ANSWER_FEEDBACK_SCHEMA)?;
        let fields = sanitize_fields(fields, &ANSWER_FEEDBACK_SCHEMA)?;
        let mock_id = mock_id_field(&fields)?;
        let user_answer = required_text(&fields, USER_ANSWER)?;
        let index = fields
            .number(QUESTION_INDEX)
            .map_or(0, |n| n.trunc() as usize);

        // Another user's interview is reported exactly like a missing one.
        let interview = self
            .interviews
            .select(&InterviewFilter::owned(mock_id, user.id.clone()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(MOCK_ID_REF, "Interview not found"))?;
        let question = interview
            .question(index)
            .cloned()
            .ok_or_else(|| not_found(QUESTION_INDEX, "Question not found in interview"))?;

        let raw = self
            .client
            .generate_answer_feedback(&question.question, &question.answer, &user_answer)
            .await?;
        let feedback = interpret_feedback(&raw)?;

        let record = AnswerRecord::new(
            &interview,
            &question,
            user_answer,
            feedback.clone(),
            user.id.clone(),
        );
        let answer_id = self.answers.insert(&record).await?;
        tracing::info!(
            answer_id = %answer_id,
            mock_id = %mock_id,
            question_index = index,
            rating = feedback.rating,
            "answer feedback stored"
        );

        Ok(GenerateFeedbackResult {
            answer_id: Some(answer_id),
            feedback,
        })
    }
}

fn mock_id_field(fields: &ValidatedFields) -> Result<MockId, PipelineError> {
    let raw = required_text(fields, MOCK_ID_REF)?;
    MockId::from_str(&raw).map_err(|_| {
        PipelineError::FieldValidationFailed(vec![FieldError::new(
            MOCK_ID_REF,
            format!("{MOCK_ID_REF} has an invalid format"),
            ValidationCode::PatternError,
        )])
    })
}

fn not_found(field: &str, message: &str) -> PipelineError {
    PipelineError::FieldValidationFailed(vec![FieldError::new(
        field,
        message,
        ValidationCode::NotFound,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use crate::adapters::storage::{InMemoryAnswerRepository, InMemoryInterviewRepository};
    use crate::application::handlers::interview::test_support::{gate, OTHER_TOKEN, TOKEN};
    use crate::domain::foundation::UserId;
    use crate::domain::generation::{NormalizedQuestionSet, QuestionAnswer};
    use crate::domain::interview::{AnswerFilter, MockInterview};

    const FEEDBACK: &str = r#"{"rating": 8, "feedback": "Solid", "strengths": ["clear"], "improvements": "none"}"#;

    struct Fixture {
        handler: GenerateFeedbackHandler,
        generator: MockTextGenerator,
        answers: InMemoryAnswerRepository,
        interview: MockInterview,
    }

    async fn fixture(generator: MockTextGenerator) -> Fixture {
        let interviews = InMemoryInterviewRepository::new();
        let answers = InMemoryAnswerRepository::new();
        let interview = MockInterview::new(
            "Backend Engineer".to_string(),
            "Rust services".to_string(),
            3,
            NormalizedQuestionSet {
                questions: vec![
                    QuestionAnswer {
                        question: "What is ownership?".to_string(),
                        answer: "Single owner, moved or borrowed".to_string(),
                    },
                    QuestionAnswer {
                        question: "What is Send?".to_string(),
                        answer: "Safe to move across threads".to_string(),
                    },
                ],
            },
            UserId::new("user-a").unwrap(),
        );
        interviews.insert(&interview).await.unwrap();

        let handler = GenerateFeedbackHandler::new(
            gate(),
            GenerationClient::new(Arc::new(generator.clone())),
            Arc::new(interviews),
            Arc::new(answers.clone()),
        );
        Fixture {
            handler,
            generator,
            answers,
            interview,
        }
    }

    fn cmd(authorization: &str, body: Value) -> GenerateFeedbackCommand {
        GenerateFeedbackCommand {
            authorization: Some(authorization.to_string()),
            body: body.to_string().into_bytes().into(),
        }
    }

    #[tokio::test]
    async fn prompt_feedback_is_not_stored() {
        let f = fixture(MockTextGenerator::new().with_reply(FEEDBACK)).await;

        let processed = f
            .handler
            .handle(cmd(TOKEN, serde_json::json!({"prompt": "Explain the borrow checker"})))
            .await
            .unwrap();
        assert_eq!(processed.data.answer_id, None);
        assert_eq!(processed.data.feedback.rating, 8);
        assert_eq!(processed.data.feedback.strengths, vec!["clear"]);
        assert!(processed.data.feedback.improvements.is_empty());
        assert!(f.answers.is_empty().await);
    }

    #[tokio::test]
    async fn answer_feedback_is_stored_against_the_question() {
        let f = fixture(MockTextGenerator::new().with_deferred_reply(FEEDBACK)).await;

        let processed = f
            .handler
            .handle(cmd(
                TOKEN,
                serde_json::json!({
                    "mockIdRef": f.interview.mock_id.to_string(),
                    "userAnswer": "Values <b>move</b> by default",
                    "questionIndex": 0
                }),
            ))
            .await
            .unwrap();

        let stored = f
            .answers
            .select(&AnswerFilter::owned(
                f.interview.mock_id,
                UserId::new("user-a").unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(Some(stored[0].id), processed.data.answer_id);
        assert_eq!(stored[0].question, "What is ownership?");
        assert_eq!(stored[0].user_answer, "Values move by default");

        let prompt = &f.generator.get_calls()[0].prompt;
        assert!(prompt.contains("Single owner, moved or borrowed"));
    }

    #[tokio::test]
    async fn question_index_defaults_to_first_question() {
        let f = fixture(MockTextGenerator::new().with_reply(FEEDBACK)).await;
        f.handler
            .handle(cmd(
                TOKEN,
                serde_json::json!({
                    "mockIdRef": f.interview.mock_id.to_string(),
                    "userAnswer": "answer"
                }),
            ))
            .await
            .unwrap();
        assert!(f.generator.get_calls()[0].prompt.contains("What is ownership?"));
    }

    #[tokio::test]
    async fn other_users_interview_is_not_found() {
        let f = fixture(MockTextGenerator::new().with_reply(FEEDBACK)).await;

        let err = f
            .handler
            .handle(cmd(
                OTHER_TOKEN,
                serde_json::json!({
                    "mockIdRef": f.interview.mock_id.to_string(),
                    "userAnswer": "answer"
                }),
            ))
            .await
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors[0].field, MOCK_ID_REF);
        assert_eq!(errors[0].code, ValidationCode::NotFound);
        assert_eq!(err.status_code(), 400);
        assert_eq!(f.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn out_of_range_question_is_not_found() {
        let f = fixture(MockTextGenerator::new().with_reply(FEEDBACK)).await;

        let err = f
            .handler
            .handle(cmd(
                TOKEN,
                serde_json::json!({
                    "mockIdRef": f.interview.mock_id.to_string(),
                    "userAnswer": "answer",
                    "questionIndex": 7
                }),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.field_errors().unwrap()[0].field, QUESTION_INDEX);
    }

    #[tokio::test]
    async fn body_without_prompt_uses_answer_schema() {
        let f = fixture(MockTextGenerator::new()).await;

        let err = f
            .handler
            .handle(cmd(TOKEN, serde_json::json!({"mockIdRef": "not-a-uuid"})))
            .await
            .unwrap_err();
        let fields: Vec<String> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.clone())
            .collect();
        assert!(fields.contains(&MOCK_ID_REF.to_string()));
        assert!(fields.contains(&USER_ANSWER.to_string()));
    }

    #[tokio::test]
    async fn generator_faults_store_nothing() {
        let f = fixture(MockTextGenerator::new().with_reply("I cannot help with that.")).await;

        let err = f
            .handler
            .handle(cmd(
                TOKEN,
                serde_json::json!({
                    "mockIdRef": f.interview.mock_id.to_string(),
                    "userAnswer": "answer"
                }),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionFailed { .. }));
        assert!(f.answers.is_empty().await);
    }
}

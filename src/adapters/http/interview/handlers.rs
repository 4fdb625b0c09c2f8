//! HTTP handlers for mock interview endpoints.
//!
//! Handlers forward the raw `Authorization` header and body bytes to the
//! application handlers, which own the stage order. Every pipeline future
//! runs under `catch_unwind` so a panicking stage still yields an envelope.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::FutureExt;

use crate::adapters::http::envelope::{error_response, success_response, Endpoint};
use crate::application::{
    GenerateFeedbackCommand, GenerateFeedbackHandler, GenerateQuestionsCommand,
    GenerateQuestionsHandler, ListAnswersHandler, ListAnswersQuery, PipelineError, RequestBody,
};

use super::dto::{AnswerResponse, FeedbackResponse, HealthResponse, InterviewCreatedResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InterviewAppState {
    pub generate_questions: Arc<GenerateQuestionsHandler>,
    pub generate_feedback: Arc<GenerateFeedbackHandler>,
    pub list_answers: Arc<ListAnswersHandler>,
}

impl InterviewAppState {
    pub fn new(
        generate_questions: GenerateQuestionsHandler,
        generate_feedback: GenerateFeedbackHandler,
        list_answers: ListAnswersHandler,
    ) -> Self {
        Self {
            generate_questions: Arc::new(generate_questions),
            generate_feedback: Arc::new(generate_feedback),
            list_answers: Arc::new(list_answers),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/interviews - Generate questions and create a mock interview
pub async fn generate_questions(
    State(state): State<InterviewAppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let cmd = GenerateQuestionsCommand {
        authorization: authorization(&headers),
        body: request_body(body),
    };

    match guarded(state.generate_questions.handle(cmd)).await {
        Ok(processed) => success_response(
            StatusCode::CREATED,
            InterviewCreatedResponse::from(processed.data),
            &processed.rate,
            Endpoint::Mutating,
        ),
        Err(err) => error_response(&err, Endpoint::Mutating),
    }
}

/// POST /api/feedback - Evaluate free text or an answer to a stored question
pub async fn generate_feedback(
    State(state): State<InterviewAppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let cmd = GenerateFeedbackCommand {
        authorization: authorization(&headers),
        body: request_body(body),
    };

    match guarded(state.generate_feedback.handle(cmd)).await {
        Ok(processed) => success_response(
            StatusCode::OK,
            FeedbackResponse::from(processed.data),
            &processed.rate,
            Endpoint::Mutating,
        ),
        Err(err) => error_response(&err, Endpoint::Mutating),
    }
}

/// GET /api/interviews/:mockId/answers - List the caller's answers
pub async fn list_answers(
    State(state): State<InterviewAppState>,
    headers: HeaderMap,
    Path(mock_id): Path<String>,
) -> Response {
    let query = ListAnswersQuery {
        authorization: authorization(&headers),
        mock_id,
    };

    match guarded(state.list_answers.handle(query)).await {
        Ok(processed) => {
            let answers: Vec<AnswerResponse> =
                processed.data.into_iter().map(AnswerResponse::from).collect();
            success_response(StatusCode::OK, answers, &processed.rate, Endpoint::ReadOnly)
        }
        Err(err) => error_response(&err, Endpoint::ReadOnly),
    }
}

/// GET /health
pub async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse::ok())).into_response()
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

// Body rejections (size limit, broken stream) go through the pipeline so
// they are reported after auth and rate limiting.
fn request_body(body: Result<Bytes, BytesRejection>) -> RequestBody {
    match body {
        Ok(bytes) => RequestBody::Received(bytes.to_vec()),
        Err(rejection) => RequestBody::Unreadable(rejection.body_text()),
    }
}

/// Runs a pipeline future, reporting a panic as an internal error.
async fn guarded<T, F>(pipeline: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(panic = %detail, "pipeline stage panicked");
            Err(PipelineError::internal(detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let exploding = async {
            let stages: Vec<u8> = Vec::new();
            let first = stages[0];
            Ok::<u8, PipelineError>(first)
        };
        let result = guarded(exploding).await;
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[tokio::test]
    async fn results_pass_through() {
        let ok: Result<u8, PipelineError> = guarded(async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);
        let err: Result<u8, PipelineError> = guarded(async { Err(PipelineError::AuthRequired) }).await;
        assert!(matches!(err, Err(PipelineError::AuthRequired)));
    }

    #[test]
    fn authorization_header_is_read_verbatim() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(authorization(&headers).as_deref(), Some("Bearer abc"));
    }
}

//! Axum router for the mock interview API.

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    response::Response,
    routing::{get, post},
    BoxError, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::adapters::http::envelope::{error_response, Endpoint};
use crate::application::PipelineError;

use super::handlers::{generate_feedback, generate_questions, health, list_answers, InterviewAppState};

/// Transport limits applied in front of every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl HttpLimits {
    pub fn new(request_timeout: Duration, max_body_bytes: usize) -> Self {
        Self {
            request_timeout,
            max_body_bytes,
        }
    }
}

/// Routes relative to `/api`.
///
/// - `POST /interviews` - generate questions, create an interview
/// - `POST /feedback` - evaluate a prompt or a stored question's answer
/// - `GET /interviews/:mockId/answers` - list the caller's answers
pub fn interview_routes() -> Router<InterviewAppState> {
    Router::new()
        .route("/interviews", post(generate_questions))
        .route("/feedback", post(generate_feedback))
        .route("/interviews/:mockId/answers", get(list_answers))
}

/// Complete application router with tracing, request ids, a body limit and
/// a request timeout.
///
/// Bodies over the limit surface as a 400 envelope from the handlers. A
/// timed-out request is answered with a 500 envelope.
pub fn app_router(state: InterviewAppState, limits: HttpLimits) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", interview_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(HandleErrorLayer::new(request_failed))
                .layer(TimeoutLayer::new(limits.request_timeout)),
        )
        .layer(middleware::map_response(nosniff))
}

async fn request_failed(method: Method, err: BoxError) -> Response {
    let failure = if err.is::<Elapsed>() {
        PipelineError::internal("request timed out")
    } else {
        PipelineError::internal(format!("middleware failure: {err}"))
    };
    let endpoint = if method == Method::GET {
        Endpoint::ReadOnly
    } else {
        Endpoint::Mutating
    };
    error_response(&failure, endpoint)
}

// Outermost, so it also covers 404 and 405 from the router itself.
async fn nosniff(mut response: Response) -> Response {
    response.headers_mut().insert(
        axum::http::header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

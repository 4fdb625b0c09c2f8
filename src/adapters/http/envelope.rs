//! Uniform response envelope and header set.
//!
//! Every response body is `{success, data?, error?, errors?}`. Headers:
//! - `Content-Type: application/json` and `X-Content-Type-Options: nosniff` always
//! - `Cache-Control`/`Pragma` no-cache directives on mutating endpoints
//! - `X-RateLimit-*` on admitted requests, plus `Retry-After` on 429

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::PipelineError;
use crate::domain::security::RateDecision;
use crate::domain::validation::{FieldError, ValidationCode};

/// Rate limit header names.
pub mod rate_headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
}

const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// Whether the endpoint changes server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Mutating,
    ReadOnly,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
    pub code: ValidationCode,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            message: err.message.clone(),
            code: err.code,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorBody>>,
}

impl<T: Serialize> ResponseEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }
}

impl ResponseEnvelope<()> {
    pub fn failure(err: &PipelineError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.client_message().to_string()),
            errors: err
                .field_errors()
                .map(|errors| errors.iter().map(FieldErrorBody::from).collect()),
        }
    }
}

/// Builds a success response with rate and caching headers.
pub fn success_response<T: Serialize>(
    status: StatusCode,
    data: T,
    rate: &RateDecision,
    endpoint: Endpoint,
) -> Response {
    let mut response = (status, Json(ResponseEnvelope::success(data))).into_response();
    let headers = response.headers_mut();
    apply_fixed_headers(headers, endpoint);
    set_number(headers, &rate_headers::X_RATELIMIT_LIMIT, u64::from(rate.limit()));
    set_number(headers, &rate_headers::X_RATELIMIT_REMAINING, u64::from(rate.remaining()));
    response
}

/// Builds the failure response for a pipeline error.
///
/// Upstream and internal detail is logged here and never leaves the process.
pub fn error_response(err: &PipelineError, endpoint: Endpoint) -> Response {
    if err.is_caller_fault() {
        tracing::debug!(error = %err, "request rejected");
    } else {
        tracing::error!(error = %err, status = err.status_code(), "request failed");
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(ResponseEnvelope::failure(err))).into_response();
    let headers = response.headers_mut();
    apply_fixed_headers(headers, endpoint);

    if let PipelineError::RateLimitExceeded {
        limit,
        retry_after_secs,
    } = err
    {
        set_number(headers, &header::RETRY_AFTER, (*retry_after_secs).max(1));
        set_number(headers, &rate_headers::X_RATELIMIT_LIMIT, u64::from(*limit));
        set_number(headers, &rate_headers::X_RATELIMIT_REMAINING, 0);
    }
    response
}

/// Sets the fixed header set on any response.
pub fn apply_fixed_headers(headers: &mut HeaderMap, endpoint: Endpoint) {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if endpoint == Endpoint::Mutating {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    }
}

fn set_number(headers: &mut HeaderMap, name: &HeaderName, value: u64) {
    headers.insert(name.clone(), HeaderValue::from(value));
}

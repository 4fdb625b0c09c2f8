//! Request admission: the caller-facing stages of the pipeline.
//!
//! Runs in a fixed order and short-circuits on the first failure:
//! resolve actor, rate-limit, parse body, schema-validate, sanitize.

use std::sync::Arc;

use serde_json::Value;

use crate::application::errors::PipelineError;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::security::{sanitize, FixedWindowRateLimiter, RateDecision, RateLimitPolicy};
use crate::domain::validation::{
    validate, FieldError, FieldValue, RequestSchema, ValidatedFields, ValidationCode,
};
use crate::ports::SessionValidator;

const BEARER_PREFIX: &str = "Bearer ";

/// Request classes with independent rate windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitedResource {
    Questions,
    Feedback,
    Reads,
}

impl RateLimitedResource {
    pub fn scope(&self) -> &'static str {
        match self {
            RateLimitedResource::Questions => "questions",
            RateLimitedResource::Feedback => "feedback",
            RateLimitedResource::Reads => "reads",
        }
    }
}

/// Limits applied per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicies {
    pub questions: RateLimitPolicy,
    pub feedback: RateLimitPolicy,
    pub reads: RateLimitPolicy,
}

impl RatePolicies {
    pub fn new(
        questions: RateLimitPolicy,
        feedback: RateLimitPolicy,
        reads: RateLimitPolicy,
    ) -> Self {
        Self {
            questions,
            feedback,
            reads,
        }
    }

    pub fn for_resource(&self, resource: RateLimitedResource) -> RateLimitPolicy {
        match resource {
            RateLimitedResource::Questions => self.questions,
            RateLimitedResource::Feedback => self.feedback,
            RateLimitedResource::Reads => self.reads,
        }
    }
}

/// A caller that passed authentication and rate limiting.
#[derive(Debug, Clone)]
pub struct Admission {
    pub user: AuthenticatedUser,
    pub rate: RateDecision,
}

#[derive(Clone)]
pub struct RequestGate {
    sessions: Arc<dyn SessionValidator>,
    limiter: FixedWindowRateLimiter,
    policies: RatePolicies,
}

impl RequestGate {
    pub fn new(
        sessions: Arc<dyn SessionValidator>,
        limiter: FixedWindowRateLimiter,
        policies: RatePolicies,
    ) -> Self {
        Self {
            sessions,
            limiter,
            policies,
        }
    }

    /// Resolves the caller from the `Authorization` header value and charges
    /// one request against their window for `resource`.
    pub async fn admit(
        &self,
        authorization: Option<&str>,
        resource: RateLimitedResource,
    ) -> Result<Admission, PipelineError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(PipelineError::AuthRequired)?;

        let user = self.sessions.validate(token).await.map_err(|err| {
            tracing::debug!(error = %err, "caller could not be resolved");
            PipelineError::from(err)
        })?;

        let key = user.actor_key().scoped(resource.scope());
        let policy = self.policies.for_resource(resource);
        match self.limiter.check(&key, policy).await {
            RateDecision::Denied {
                limit,
                retry_after_secs,
                ..
            } => {
                tracing::info!(key = %key, limit, retry_after_secs, "rate limit exceeded");
                Err(PipelineError::RateLimitExceeded {
                    limit,
                    retry_after_secs,
                })
            }
            rate => Ok(Admission { user, rate }),
        }
    }
}

impl std::fmt::Debug for RequestGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGate")
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Request body as delivered by the transport.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Received(Vec<u8>),
    /// The transport gave up on the body, e.g. it exceeded the size limit.
    Unreadable(String),
}

impl RequestBody {
    /// The body bytes; an unreadable body is reported at the parse stage.
    pub fn bytes(&self) -> Result<&[u8], PipelineError> {
        match self {
            RequestBody::Received(bytes) => Ok(bytes),
            RequestBody::Unreadable(reason) => Err(PipelineError::MalformedBody(reason.clone())),
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Received(bytes)
    }
}

/// Parses the raw body as JSON.
pub fn parse_body(body: &[u8]) -> Result<Value, PipelineError> {
    serde_json::from_slice(body).map_err(|err| PipelineError::MalformedBody(err.to_string()))
}

/// Runs the collect-all validator and lifts its errors into the pipeline.
pub fn validate_fields(
    body: &Value,
    schema: &RequestSchema,
) -> Result<ValidatedFields, PipelineError> {
    validate(body, schema)
        .into_result()
        .map_err(PipelineError::FieldValidationFailed)
}

/// Sanitizes every accepted string field to its declared maximum length.
///
/// A required field that sanitizes to nothing was markup only and is
/// reported as missing.
pub fn sanitize_fields(
    mut fields: ValidatedFields,
    schema: &RequestSchema,
) -> Result<ValidatedFields, PipelineError> {
    let mut errors = Vec::new();
    for (name, value) in fields.iter_mut() {
        let FieldValue::Text(text) = value else {
            continue;
        };
        let declared = schema.get(name);
        let cleaned = sanitize(text, declared.and_then(|s| s.max_length));
        if cleaned.is_empty() && declared.is_some_and(|s| s.required) {
            errors.push(FieldError::new(
                name.clone(),
                format!("{name} is required"),
                ValidationCode::RequiredFieldMissing,
            ));
        }
        *text = cleaned;
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(PipelineError::FieldValidationFailed(errors))
    }
}

/// Parse, validate and sanitize in one step.
pub fn accept_body(body: &[u8], schema: &RequestSchema) -> Result<ValidatedFields, PipelineError> {
    let value = parse_body(body)?;
    let fields = validate_fields(&value, schema)?;
    sanitize_fields(fields, schema)
}

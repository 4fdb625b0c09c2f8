//! Failure taxonomy of the request pipeline.
//!
//! Caller-input kinds carry detail that is safe to return. Upstream and
//! internal kinds keep their detail for logs; callers only ever see the
//! stable message of [`PipelineError::client_message`].

use thiserror::Error;

use crate::domain::foundation::AuthError;
use crate::domain::generation::{ExtractionError, GenerationError, NormalizeError};
use crate::domain::validation::FieldError;
use crate::ports::RepositoryError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("caller could not be resolved")]
    AuthRequired,

    #[error("rate limit of {limit} exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { limit: u32, retry_after_secs: u64 },

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("{} field(s) failed validation", .0.len())]
    FieldValidationFailed(Vec<FieldError>),

    #[error("generation reply carried no text")]
    NoTextInReply,

    #[error("no JSON in generation reply starting with {preview:?}")]
    ExtractionFailed { preview: String },

    #[error("generation reply structure invalid: {reason}")]
    StructureInvalid { reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// HTTP status for this failure kind.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::AuthRequired => 401,
            PipelineError::RateLimitExceeded { .. } => 429,
            PipelineError::MalformedBody(_) | PipelineError::FieldValidationFailed(_) => 400,
            PipelineError::NoTextInReply
            | PipelineError::ExtractionFailed { .. }
            | PipelineError::StructureInvalid { .. } => 502,
            PipelineError::Internal(_) => 500,
        }
    }

    /// Stable message safe to return to the caller.
    pub fn client_message(&self) -> &'static str {
        match self {
            PipelineError::AuthRequired => "Authentication required",
            PipelineError::RateLimitExceeded { .. } => "Too many requests. Please try again later.",
            PipelineError::MalformedBody(_) => "Invalid JSON in request body",
            PipelineError::FieldValidationFailed(_) => "Validation failed",
            PipelineError::NoTextInReply => "AI service returned an empty response",
            PipelineError::ExtractionFailed { .. } => {
                "AI service returned an unexpected response format"
            }
            PipelineError::StructureInvalid { .. } => {
                "AI service returned an invalid response structure"
            }
            PipelineError::Internal(_) => "Internal server error",
        }
    }

    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            PipelineError::FieldValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }

    /// True for failures caused by the caller's own request.
    pub fn is_caller_fault(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<AuthError> for PipelineError {
    fn from(err: AuthError) -> Self {
        if err.is_unresolved_actor() {
            PipelineError::AuthRequired
        } else {
            PipelineError::Internal(err.to_string())
        }
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NoTextInReply => PipelineError::NoTextInReply,
            GenerationError::Upstream(ai) => PipelineError::Internal(ai.to_string()),
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::ExtractionFailed { preview } => {
                PipelineError::ExtractionFailed { preview }
            }
        }
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::StructureInvalid { reason } => {
                PipelineError::StructureInvalid { reason }
            }
        }
    }
}

impl From<RepositoryError> for PipelineError {
    fn from(err: RepositoryError) -> Self {
        PipelineError::Internal(err.to_string())
    }
}

use thiserror::Error;

use crate::ports::AIError;

/// Failures of a single generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The reply resolved to no usable text.
    #[error("generation reply carried no text")]
    NoTextInReply,

    /// The service could not be reached or refused the request.
    #[error(transparent)]
    Upstream(#[from] AIError),
}

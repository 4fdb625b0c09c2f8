//! Ports - interfaces for external dependencies.
//!
//! - `SessionValidator` - resolves the caller from a bearer token
//! - `RateLimitStore` - fixed-window counter storage
//! - `TextGenerator` - external text generation service
//! - `InterviewRepository` / `AnswerRepository` - record persistence

mod interview_repository;
mod rate_limiter;
mod session_validator;
mod text_generator;

pub use interview_repository::{AnswerRepository, InterviewRepository, RepositoryError};
pub use rate_limiter::{RateLimitError, RateLimitStore};
pub use session_validator::SessionValidator;
pub use text_generator::{AIError, TextGenerator};

//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the authenticated caller, and the
//! value-object error type.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::ValidationError;
pub use ids::{ActorKey, AnswerId, MockId, UserId};
pub use timestamp::Timestamp;

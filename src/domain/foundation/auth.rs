//! Authentication types for the domain layer.
//!
//! These types represent the caller resolved from request credentials. They
//! have no provider dependencies; any identity adapter populates them through
//! the `SessionValidator` port.

use super::{ActorKey, UserId};
use thiserror::Error;

/// Caller resolved from a validated credential.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// Email address, when the provider includes one.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self { id, email }
    }

    /// Key used to scope rate limiting to this caller.
    pub fn actor_key(&self) -> ActorKey {
        ActorKey::for_user(&self.id)
    }
}

/// Authentication errors that can occur during credential resolution.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The identity service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the caller simply could not be resolved.
    pub fn is_unresolved_actor(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

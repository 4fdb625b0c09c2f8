//! Session validation port: resolves a caller from a bearer credential.
//!
//! Implementations MUST validate:
//! - **Signature**: token was issued with the configured key
//! - **Issuer (iss)** and **Audience (aud)**: token is meant for this service
//! - **Expiry (exp)**: token is not expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient failures
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

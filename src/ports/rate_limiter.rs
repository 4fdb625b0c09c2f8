//! Rate limit store port.
//!
//! The fixed-window counters live behind this trait so the limiter can be
//! backed by a process-local map or by Redis. The store owns atomicity of
//! the replace-or-increment step; the policy (limit, allow/deny) lives in
//! [`FixedWindowRateLimiter`](crate::domain::security::FixedWindowRateLimiter).

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::{ActorKey, Timestamp};
use crate::domain::security::RateWindow;

/// Port for fixed-window counter storage.
///
/// Implementations must make `hit` atomic per key: two concurrent hits on
/// the same key must observe distinct counts. Hits on different keys must
/// not serialize on each other.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records one request against `key` and returns the resulting window.
    ///
    /// When no window exists or `now >= reset_at`, the window is replaced by
    /// `{count: 1, reset_at: now + window}`. Otherwise the count is incremented.
    async fn hit(
        &self,
        key: &ActorKey,
        window: Duration,
        now: Timestamp,
    ) -> Result<RateWindow, RateLimitError>;

    /// Returns the live window for `key` without mutating it.
    ///
    /// Expired windows are reported as `None`.
    async fn peek(&self, key: &ActorKey, now: Timestamp)
        -> Result<Option<RateWindow>, RateLimitError>;
}

/// Errors that can occur during rate limit storage operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Backing store is unreachable or returned an error.
    #[error("rate limit store unavailable: {0}")]
    Unavailable(String),

    /// Store returned data the limiter cannot interpret.
    #[error("corrupt rate window: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_cause() {
        let err = RateLimitError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "rate limit store unavailable: connection refused");
    }
}

//! Fixed-window rate limiting policy.
//!
//! Each actor key owns one [`RateWindow`]. The first request, or the first
//! request at or after `reset_at`, starts a fresh window with count 1; every
//! other request increments the count. A request is allowed iff the count
//! after incrementing is `<= limit`. Bursts at window boundaries are tolerated.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{ActorKey, Timestamp};
use crate::ports::RateLimitStore;

/// Counter state for one actor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub reset_at: Timestamp,
}

impl RateWindow {
    /// A new window holding the first request.
    pub fn fresh(now: Timestamp, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now.plus(window),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        !now.is_before(&self.reset_at)
    }

    pub fn incremented(&self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            reset_at: self.reset_at,
        }
    }

    /// Applies one request to the current window state.
    ///
    /// Expired windows are replaced, never incremented.
    pub fn advance(current: Option<RateWindow>, now: Timestamp, window: Duration) -> Self {
        match current {
            Some(existing) if !existing.is_expired(now) => existing.incremented(),
            _ => Self::fresh(now, window),
        }
    }

    /// Whole seconds until the window resets, never less than 1.
    pub fn retry_after_secs(&self, now: Timestamp) -> u64 {
        let millis = self.reset_at.millis_since(&now);
        millis.div_ceil(1000).max(1)
    }
}

/// Limit and window length for one class of requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    pub fn per_window_ms(limit: u32, window_ms: u64) -> Self {
        Self::new(limit, Duration::from_millis(window_ms))
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    Allowed {
        limit: u32,
        remaining: u32,
        reset_at: Timestamp,
    },
    Denied {
        limit: u32,
        retry_after_secs: u64,
        reset_at: Timestamp,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }

    pub fn limit(&self) -> u32 {
        match self {
            RateDecision::Allowed { limit, .. } | RateDecision::Denied { limit, .. } => *limit,
        }
    }

    pub fn remaining(&self) -> u32 {
        match self {
            RateDecision::Allowed { remaining, .. } => *remaining,
            RateDecision::Denied { .. } => 0,
        }
    }

    fn from_window(window: RateWindow, policy: RateLimitPolicy, now: Timestamp) -> Self {
        if window.count <= policy.limit {
            RateDecision::Allowed {
                limit: policy.limit,
                remaining: policy.limit - window.count,
                reset_at: window.reset_at,
            }
        } else {
            RateDecision::Denied {
                limit: policy.limit,
                retry_after_secs: window.retry_after_secs(now),
                reset_at: window.reset_at,
            }
        }
    }
}

/// Per-actor fixed-window limiter over an injectable store.
///
/// Store failures fail open: the request is allowed and the failure logged.
#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl FixedWindowRateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Records a request for `key` and decides whether it may proceed.
    pub async fn check(&self, key: &ActorKey, policy: RateLimitPolicy) -> RateDecision {
        self.check_at(key, policy, Timestamp::now()).await
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub async fn check_at(
        &self,
        key: &ActorKey,
        policy: RateLimitPolicy,
        now: Timestamp,
    ) -> RateDecision {
        match self.store.hit(key, policy.window, now).await {
            Ok(window) => RateDecision::from_window(window, policy, now),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "rate limit store failed, allowing request");
                RateDecision::Allowed {
                    limit: policy.limit,
                    remaining: policy.limit.saturating_sub(1),
                    reset_at: now.plus(policy.window),
                }
            }
        }
    }

    /// Boolean form of [`check`](Self::check).
    pub async fn is_allowed(&self, key: &ActorKey, limit: u32, window: Duration) -> bool {
        self.check(key, RateLimitPolicy::new(limit, window))
            .await
            .is_allowed()
    }

    /// Requests left in the current window without consuming one.
    pub async fn remaining(&self, key: &ActorKey, limit: u32) -> u32 {
        self.remaining_at(key, limit, Timestamp::now()).await
    }

    pub async fn remaining_at(&self, key: &ActorKey, limit: u32, now: Timestamp) -> u32 {
        match self.store.peek(key, now).await {
            Ok(Some(window)) => limit.saturating_sub(window.count),
            Ok(None) => limit,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "rate limit store failed on peek");
                limit
            }
        }
    }
}

impl std::fmt::Debug for FixedWindowRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowRateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::InMemoryRateLimitStore;
    use crate::ports::RateLimitError;
    use async_trait::async_trait;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_unix_millis(1_700_000_000_000 + millis)
    }

    fn limiter() -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(Arc::new(InMemoryRateLimitStore::new()))
    }

    #[test]
    fn advance_replaces_expired_window() {
        let window = Duration::from_millis(1000);
        let first = RateWindow::advance(None, at(0), window);
        assert_eq!(first.count, 1);
        assert_eq!(first.reset_at, at(1000));

        let second = RateWindow::advance(Some(first), at(999), window);
        assert_eq!(second.count, 2);
        assert_eq!(second.reset_at, at(1000));

        let third = RateWindow::advance(Some(second), at(1000), window);
        assert_eq!(third.count, 1);
        assert_eq!(third.reset_at, at(2000));
    }

    #[test]
    fn retry_after_rounds_up_and_is_at_least_one() {
        let window = RateWindow {
            count: 3,
            reset_at: at(1500),
        };
        assert_eq!(window.retry_after_secs(at(0)), 2);
        assert_eq!(window.retry_after_secs(at(1499)), 1);
        assert_eq!(window.retry_after_secs(at(2000)), 1);
    }

    #[tokio::test]
    async fn third_call_within_window_is_rejected_then_window_resets() {
        let limiter = limiter();
        let key = ActorKey::from("user:a");
        let policy = RateLimitPolicy::per_window_ms(2, 1000);

        assert!(limiter.check_at(&key, policy, at(0)).await.is_allowed());
        assert!(limiter.check_at(&key, policy, at(1)).await.is_allowed());

        let third = limiter.check_at(&key, policy, at(2)).await;
        assert!(!third.is_allowed());
        assert!(matches!(third, RateDecision::Denied { limit: 2, retry_after_secs: 1, .. }));

        let after_reset = limiter.check_at(&key, policy, at(1100)).await;
        assert!(after_reset.is_allowed());
        assert_eq!(after_reset.remaining(), 1);
        assert_eq!(limiter.remaining_at(&key, 2, at(1101)).await, 1);
    }

    #[tokio::test]
    async fn keys_have_independent_windows() {
        let limiter = limiter();
        let policy = RateLimitPolicy::per_window_ms(1, 60_000);
        let a = ActorKey::from("user:a");
        let b = ActorKey::from("user:b");

        assert!(limiter.check_at(&a, policy, at(0)).await.is_allowed());
        assert!(!limiter.check_at(&a, policy, at(1)).await.is_allowed());
        assert!(limiter.check_at(&b, policy, at(2)).await.is_allowed());
    }

    #[tokio::test]
    async fn remaining_does_not_consume() {
        let limiter = limiter();
        let key = ActorKey::from("user:peek");
        assert_eq!(limiter.remaining(&key, 5).await, 5);
        assert!(limiter.is_allowed(&key, 5, Duration::from_secs(60)).await);
        assert_eq!(limiter.remaining(&key, 5).await, 4);
        assert_eq!(limiter.remaining(&key, 5).await, 4);
    }

    #[tokio::test]
    async fn concurrent_hits_on_one_key_never_over_admit() {
        let limiter = limiter();
        let key = ActorKey::from("user:burst");
        let policy = RateLimitPolicy::new(10, Duration::from_secs(60));

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let limiter = limiter.clone();
            let key = key.clone();
            tasks.push(tokio::spawn(async move { limiter.check(&key, policy).await }));
        }

        let mut allowed = 0;
        for task in tasks {
            if task.await.unwrap().is_allowed() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 10);
    }

    struct BrokenStore;

    #[async_trait]
    impl RateLimitStore for BrokenStore {
        async fn hit(
            &self,
            _key: &ActorKey,
            _window: Duration,
            _now: Timestamp,
        ) -> Result<RateWindow, RateLimitError> {
            Err(RateLimitError::Unavailable("down".to_string()))
        }

        async fn peek(
            &self,
            _key: &ActorKey,
            _now: Timestamp,
        ) -> Result<Option<RateWindow>, RateLimitError> {
            Err(RateLimitError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn store_failure_fails_open() {
        let limiter = FixedWindowRateLimiter::new(Arc::new(BrokenStore));
        let key = ActorKey::from("user:x");
        let decision = limiter.check(&key, RateLimitPolicy::per_window_ms(3, 1000)).await;
        assert!(decision.is_allowed());
        assert_eq!(decision.remaining(), 2);
        assert_eq!(limiter.remaining(&key, 3).await, 3);
    }
}

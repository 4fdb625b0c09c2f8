//! In-memory rate limit store for tests and single-process deployments.
//!
//! Windows live in a `HashMap` behind an `RwLock`; each entry carries its own
//! `Mutex`, so the read-modify-write of one key never blocks another key.
//! Entries are never evicted; an expired window is overwritten on the next hit.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{ActorKey, Timestamp};
use crate::domain::security::RateWindow;
use crate::ports::{RateLimitError, RateLimitStore};

type WindowSlot = Arc<Mutex<Option<RateWindow>>>;

/// Process-local fixed-window counters.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: RwLock<HashMap<String, WindowSlot>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, key: &ActorKey) -> WindowSlot {
        if let Some(slot) = self.windows.read().await.get(key.as_str()) {
            return Arc::clone(slot);
        }
        let mut windows = self.windows.write().await;
        Arc::clone(windows.entry(key.as_str().to_string()).or_default())
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(
        &self,
        key: &ActorKey,
        window: Duration,
        now: Timestamp,
    ) -> Result<RateWindow, RateLimitError> {
        let slot = self.slot(key).await;
        let mut current = slot.lock().await;
        let next = RateWindow::advance(*current, now, window);
        *current = Some(next);
        Ok(next)
    }

    async fn peek(
        &self,
        key: &ActorKey,
        now: Timestamp,
    ) -> Result<Option<RateWindow>, RateLimitError> {
        let slot = match self.windows.read().await.get(key.as_str()) {
            Some(slot) => Arc::clone(slot),
            None => return Ok(None),
        };
        let current = *slot.lock().await;
        Ok(current.filter(|window| !window.is_expired(now)))
    }
}

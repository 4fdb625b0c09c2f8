//! Redis-backed rate limit store for multi-instance deployments.
//!
//! One Lua script performs INCR, sets PEXPIRE on the first hit of a window and
//! reads PTTL, so the replace-or-increment step is atomic on the server.
//! Redis expiry replaces the window: once the key is gone the next INCR
//! starts again at 1.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::Duration;

use crate::domain::foundation::{ActorKey, Timestamp};
use crate::domain::security::RateWindow;
use crate::ports::{RateLimitError, RateLimitStore};

const HIT_SCRIPT: &str = r"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
  redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
  redis.call('PEXPIRE', KEYS[1], ARGV[1])
  ttl = tonumber(ARGV[1])
end
return {count, ttl}
";

/// Fixed-window counters stored as expiring Redis integers.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    conn: MultiplexedConnection,
    key_prefix: String,
    script: redis::Script,
}

impl RedisRateLimitStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "ratelimit".to_string(),
            script: redis::Script::new(HIT_SCRIPT),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn redis_key(&self, key: &ActorKey) -> String {
        format!("{}:{}", self.key_prefix, key.as_str())
    }
}

fn unavailable(err: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(err.to_string())
}

fn window_from(count: i64, ttl_ms: i64, now: Timestamp) -> Result<RateWindow, RateLimitError> {
    let count = u32::try_from(count)
        .map_err(|_| RateLimitError::Corrupt(format!("count out of range: {count}")))?;
    let ttl_ms = u64::try_from(ttl_ms).unwrap_or(0);
    Ok(RateWindow {
        count,
        reset_at: now.plus(Duration::from_millis(ttl_ms)),
    })
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(
        &self,
        key: &ActorKey,
        window: Duration,
        now: Timestamp,
    ) -> Result<RateWindow, RateLimitError> {
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut conn = self.conn.clone();

        let (count, ttl_ms): (i64, i64) = self
            .script
            .key(self.redis_key(key))
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;

        window_from(count, ttl_ms, now)
    }

    async fn peek(
        &self,
        key: &ActorKey,
        now: Timestamp,
    ) -> Result<Option<RateWindow>, RateLimitError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.conn.clone();

        let (count, ttl_ms): (Option<i64>, i64) = redis::pipe()
            .cmd("GET")
            .arg(&redis_key)
            .cmd("PTTL")
            .arg(&redis_key)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        match count {
            Some(count) if ttl_ms > 0 => window_from(count, ttl_ms, now).map(Some),
            _ => Ok(None),
        }
    }
}

impl std::fmt::Debug for RedisRateLimitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimitStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_from_maps_ttl_to_reset() {
        let now = Timestamp::from_unix_millis(10_000);
        let window = window_from(3, 2_500, now).unwrap();
        assert_eq!(window.count, 3);
        assert_eq!(window.reset_at, Timestamp::from_unix_millis(12_500));
    }

    #[test]
    fn window_from_rejects_negative_counts() {
        let now = Timestamp::from_unix_millis(0);
        assert!(matches!(
            window_from(-1, 100, now),
            Err(RateLimitError::Corrupt(_))
        ));
    }

    // Round trips against a live server need a running Redis instance:
    //
    // #[tokio::test]
    // #[ignore]
    // async fn hits_against_live_redis() {
    //     let client = redis::Client::open("redis://127.0.0.1/").unwrap();
    //     let conn = client.get_multiplexed_tokio_connection().await.unwrap();
    //     let store = RedisRateLimitStore::new(conn);
    // }
}

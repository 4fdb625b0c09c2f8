//! Rate limit store adapters.
//!
//! - `InMemoryRateLimitStore` - per-process counters, used when no Redis URL is configured
//! - `RedisRateLimitStore` - shared counters for multi-instance deployments

mod in_memory;
mod redis;

pub use in_memory::InMemoryRateLimitStore;
pub use redis::RedisRateLimitStore;

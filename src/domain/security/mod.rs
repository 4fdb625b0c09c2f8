//! Request hardening: input sanitization and per-actor rate limiting.

mod rate_limit;
mod sanitizer;

pub use rate_limit::{FixedWindowRateLimiter, RateDecision, RateLimitPolicy, RateWindow};
pub use sanitizer::{sanitize, sanitize_value};

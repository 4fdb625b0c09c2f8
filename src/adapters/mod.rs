//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - text generators (Anthropic, mock) and their retry/timeout decorators
//! - `auth` - session validators (JWT, mock)
//! - `http` - axum router, handlers and the response envelope
//! - `postgres` - sqlx-backed interview and answer repositories
//! - `rate_limiter` - rate limit stores (in-memory, Redis)
//! - `storage` - in-memory interview and answer repositories

pub mod ai;
pub mod auth;
pub mod http;
pub mod postgres;
pub mod rate_limiter;
pub mod storage;

//! HTTP adapters - REST API implementations.

pub mod envelope;
pub mod interview;

pub use envelope::{ResponseEnvelope, Endpoint};
pub use interview::{app_router, HttpLimits, InterviewAppState};

//! HTTP adapter for the mock interview pipeline.
//!
//! - `POST /api/interviews` - question generation
//! - `POST /api/feedback` - feedback generation
//! - `GET /api/interviews/:mockId/answers` - stored answers
//! - `GET /health`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::InterviewAppState;
pub use routes::{app_router, interview_routes, HttpLimits};

//! Application layer - the request pipeline and its handlers.
//!
//! The gate runs the caller-facing stages (auth, rate limit, body parsing,
//! validation, sanitization). Handlers add the generation stages and
//! persistence on top.

pub mod errors;
pub mod gate;
pub mod generation_client;
pub mod handlers;
pub mod reply_interpreter;

pub use errors::PipelineError;
pub use gate::{Admission, RateLimitedResource, RatePolicies, RequestBody, RequestGate};
pub use generation_client::GenerationClient;
pub use handlers::interview::{
    GenerateFeedbackCommand, GenerateFeedbackHandler, GenerateFeedbackResult,
    GenerateQuestionsCommand, GenerateQuestionsHandler, GenerateQuestionsResult,
    ListAnswersHandler, ListAnswersQuery, Processed,
};

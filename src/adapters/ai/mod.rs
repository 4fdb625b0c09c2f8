//! Text generation adapters.
//!
//! - `AnthropicTextGenerator` - Claude Messages API
//! - `MockTextGenerator` - queued replies for tests and local runs
//! - `RetryingTextGenerator` / `TimeoutTextGenerator` - decorators over any generator

mod anthropic_generator;
mod mock_generator;
mod retrying_generator;
mod timeout_generator;

pub use anthropic_generator::{AnthropicConfig, AnthropicTextGenerator};
pub use mock_generator::{MockReply, MockTextGenerator};
pub use retrying_generator::RetryingTextGenerator;
pub use timeout_generator::TimeoutTextGenerator;

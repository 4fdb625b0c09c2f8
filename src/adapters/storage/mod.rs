//! Process-local persistence adapters.

mod in_memory;

pub use in_memory::{InMemoryAnswerRepository, InMemoryInterviewRepository};

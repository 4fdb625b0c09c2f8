//! PostgreSQL adapters.

mod interview_repository;

pub use interview_repository::{PostgresAnswerRepository, PostgresInterviewRepository};

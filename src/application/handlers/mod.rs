//! Command and query handlers.

pub mod interview;

//! Interview Guard - defensive request pipeline for AI mock interviews
//!
//! Authenticates and rate-limits callers, validates and sanitizes their
//! input, calls a text generation service and recovers a well-formed
//! question set or feedback object from its free-text reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

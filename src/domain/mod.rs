//! Domain layer: pure request-hardening and generation logic.

pub mod foundation;
pub mod generation;
pub mod interview;
pub mod security;
pub mod validation;

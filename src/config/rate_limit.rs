//! Rate limit configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::security::RateLimitPolicy;

/// Per-endpoint request budgets sharing one window length.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Question generation requests per window
    #[serde(default = "default_questions")]
    pub questions_per_window: u32,

    /// Feedback generation requests per window
    #[serde(default = "default_feedback")]
    pub feedback_per_window: u32,

    /// Answer listing requests per window
    #[serde(default = "default_reads")]
    pub reads_per_window: u32,

    #[serde(default = "default_window")]
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn questions(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.questions_per_window, self.window())
    }

    pub fn feedback(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.feedback_per_window, self.window())
    }

    pub fn reads(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.reads_per_window, self.window())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window_secs == 0
            || self.questions_per_window == 0
            || self.feedback_per_window == 0
            || self.reads_per_window == 0
        {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            questions_per_window: default_questions(),
            feedback_per_window: default_feedback(),
            reads_per_window: default_reads(),
            window_secs: default_window(),
        }
    }
}

fn default_questions() -> u32 {
    5
}

fn default_feedback() -> u32 {
    20
}

fn default_reads() -> u32 {
    60
}

fn default_window() -> u64 {
    60
}

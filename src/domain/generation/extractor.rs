//! Recovery of a JSON value from free-form reply text.
//!
//! Strategies run in order and the first successful parse wins:
//! 1. the whole text
//! 2. the interior of a single fenced block (optionally tagged `json`)
//! 3. the span from the first `{` to the last `}`
//! 4. the span from the first `[` to the last `]`

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Characters of the offending text kept for diagnostics.
pub const PREVIEW_CHARS: usize = 100;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(json)?\s*(.*)\s*```$").expect("fence pattern compiles"));

/// Which strategy recovered the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Direct,
    FencedBlock,
    ObjectSpan,
    ArraySpan,
}

/// A recovered JSON value and the strategy that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub value: Value,
    pub strategy: ExtractionStrategy,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// No strategy produced valid JSON. `preview` is for logs only.
    #[error("no JSON could be extracted from reply starting with {preview:?}")]
    ExtractionFailed { preview: String },
}

/// Extracts the first JSON value the strategy cascade can recover.
pub fn extract_json(text: &str) -> Result<Extracted, ExtractionError> {
    let attempts: [(ExtractionStrategy, fn(&str) -> Option<&str>); 4] = [
        (ExtractionStrategy::Direct, |t| Some(t)),
        (ExtractionStrategy::FencedBlock, fenced_interior),
        (ExtractionStrategy::ObjectSpan, |t| delimited_span(t, '{', '}')),
        (ExtractionStrategy::ArraySpan, |t| delimited_span(t, '[', ']')),
    ];

    for (strategy, candidate) in attempts {
        let Some(candidate) = candidate(text) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Ok(Extracted { value, strategy });
        }
    }

    Err(ExtractionError::ExtractionFailed {
        preview: text.chars().take(PREVIEW_CHARS).collect(),
    })
}

fn fenced_interior(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text.trim())
        .and_then(|captures| captures.get(2))
        .map(|interior| interior.as_str())
}

fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

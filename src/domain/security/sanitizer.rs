//! Markup and script stripping for caller- and model-supplied strings.
//!
//! Every string accepted by the schema validator passes through
//! [`sanitize`] before it is embedded in a prompt, and every string the
//! normalizer keeps from a generation reply does too.
//!
//! # Steps
//! 1. Trim surrounding whitespace and drop control characters
//! 2. Remove `<script>`/`<style>` blocks with their content, then every tag
//! 3. Remove residual entities, angle brackets, dangerous URL schemes and
//!    `on*=` handler attributes
//! 4. Truncate to the requested maximum length (in characters)
//!
//! Steps 1-3 repeat until the text stops changing, so stripping one pattern
//! can never assemble another one out of the leftovers. This is what makes
//! `sanitize(sanitize(x)) == sanitize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>").expect("script pattern compiles")
});

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*style\b[^>]*>.*?<\s*/\s*style\s*>").expect("style pattern compiles")
});

// An opening script/style tag with no closing tag swallows the rest of the text.
static UNTERMINATED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*(script|style)\b.*$").expect("unterminated block pattern compiles")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"));

// Only terminated entities; `R&D` and `AT&T` are prose.
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("entity pattern compiles")
});

// `data:` counts as a scheme only when a media type follows, and goes with it.
static DANGEROUS_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:javascript|vbscript|livescript)\s*:|data\s*:\s*[a-z0-9.+-]+/[a-z0-9.+-]+)",
    )
    .expect("scheme pattern compiles")
});

static EVENT_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").expect("handler pattern compiles"));

/// Sanitizes `text`, optionally truncating to `max_length` characters.
///
/// Never fails. The result contains no markup, no `<`/`>`, no `;`-terminated entities,
/// no `javascript:`-style schemes and no `on*=` attributes.
pub fn sanitize(text: &str, max_length: Option<usize>) -> String {
    let mut current = text.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }

    match max_length {
        Some(max) if current.chars().count() > max => {
            let truncated: String = current.chars().take(max).collect();
            truncated.trim_end().to_string()
        }
        _ => current,
    }
}

/// Sanitizes a JSON value; anything other than a string becomes empty.
pub fn sanitize_value(value: &Value, max_length: Option<usize>) -> String {
    match value {
        Value::String(s) => sanitize(s, max_length),
        _ => String::new(),
    }
}

fn sanitize_pass(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect();

    let without_blocks = SCRIPT_BLOCK.replace_all(&cleaned, "");
    let without_blocks = STYLE_BLOCK.replace_all(&without_blocks, "");
    let without_blocks = UNTERMINATED_BLOCK.replace_all(&without_blocks, "");
    let without_tags = TAG.replace_all(&without_blocks, "");

    let without_entities = ENTITY.replace_all(&without_tags, "");
    let without_brackets: String = without_entities
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();
    let without_schemes = DANGEROUS_SCHEME.replace_all(&without_brackets, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_schemes, "");

    without_handlers.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("Senior Rust Engineer", None), "Senior Rust Engineer");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(sanitize("   padded \n", None), "padded");
    }

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(sanitize("<b>bold</b> move", None), "bold move");
    }

    #[test]
    fn removes_script_blocks_with_content() {
        let input = "Hello<script>alert('x')</script> world";
        assert_eq!(sanitize(input, None), "Hello world");
    }

    #[test]
    fn removes_unterminated_script() {
        assert_eq!(sanitize("ok <script>alert(1)", None), "ok");
    }

    #[test]
    fn removes_style_blocks() {
        assert_eq!(sanitize("<style>body{}</style>text", None), "text");
    }

    #[test]
    fn removes_javascript_scheme() {
        let out = sanitize("click javascript:alert(1)", None);
        assert!(!out.to_lowercase().contains("javascript:"));
    }

    #[test]
    fn removes_data_uri_scheme_with_media_type() {
        let out = sanitize("see data:text/html;base64,PHNjcmlwdD4=", None);
        assert!(!out.to_lowercase().contains("data:"));
        assert!(!out.contains("text/html"));
    }

    #[test]
    fn ordinary_prose_survives_unchanged() {
        for input in [
            "Q&A engineer",
            "R&D team",
            "AT&T network",
            "metadata: store",
            "Big data: pipelines",
            "Salt & pepper",
        ] {
            assert_eq!(sanitize(input, None), input);
        }
    }

    #[test]
    fn removes_obfuscated_scheme_split_by_tags() {
        let out = sanitize("java<b></b>script:alert(1)", None);
        assert!(!out.to_lowercase().contains("javascript:"));
    }

    #[test]
    fn removes_event_handlers() {
        let out = sanitize("x onclick=steal() onload = y", None);
        assert!(!out.to_lowercase().contains("onclick="));
        assert!(!out.to_lowercase().contains("onload"));
    }

    #[test]
    fn removes_entities_and_stray_brackets() {
        let out = sanitize("&lt;script&gt; 3 > 2 &#x3C;", None);
        assert!(!out.contains('&'));
        assert!(!out.contains('>'));
        assert!(!out.contains('<'));
    }

    #[test]
    fn removes_control_characters() {
        assert_eq!(sanitize("a\u{0}b\u{7}c", None), "abc");
    }

    #[test]
    fn truncates_to_max_length_in_characters() {
        assert_eq!(sanitize("héllo wörld", Some(5)), "héllo");
        assert_eq!(sanitize("ab", Some(5)), "ab");
    }

    #[test]
    fn truncation_does_not_leave_trailing_space() {
        assert_eq!(sanitize("abcd efgh", Some(5)), "abcd");
    }

    #[test]
    fn non_string_values_become_empty() {
        assert_eq!(sanitize_value(&json!(42), None), "");
        assert_eq!(sanitize_value(&json!(null), None), "");
        assert_eq!(sanitize_value(&json!(" <i>x</i> "), None), "x");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let once = sanitize("<a href=\"javascript:x\" onclick=\"y\">link</a>&amp; more", Some(20));
        assert_eq!(sanitize(&once, Some(20)), once);
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(input in "\\PC{0,80}", max in proptest::option::of(0usize..40)) {
            let once = sanitize(&input, max);
            prop_assert_eq!(sanitize(&once, max), once);
        }

        #[test]
        fn sanitize_is_idempotent_on_markup(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("<".to_string()),
                    Just(">".to_string()),
                    Just("script".to_string()),
                    Just("javascript:".to_string()),
                    Just("on".to_string()),
                    Just("click=".to_string()),
                    Just("&amp;".to_string()),
                    Just("&".to_string()),
                    Just("data:".to_string()),
                    Just("text/html".to_string()),
                    Just(" ".to_string()),
                    "[a-z]{1,4}",
                ],
                0..16,
            )
        ) {
            let input = parts.concat();
            let once = sanitize(&input, None);
            prop_assert_eq!(sanitize(&once, None), once.clone());
            prop_assert!(!once.contains('<'));
            prop_assert!(!once.contains('>'));
        }
    }
}

//! Structured output recovery.
//!
//! Generative services return JSON wrapped in fences, prose, or with minor
//! syntax damage. `extract_json` runs a fixed chain of total strategies, each
//! a best-effort repair; the first one that yields a JSON object wins. Only
//! objects are accepted, never bare arrays or scalars.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

// interior of the first ```...``` block, optional language tag
static FENCED_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[a-zA-Z]+)?\s*(.*?)```").unwrap());

static FENCE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:[a-zA-Z]+)?").unwrap());

static TRAILING_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Recover a JSON object from raw response text. Returns `None` when every
/// strategy fails; never panics or errors.
pub fn extract_json(raw: &str) -> Option<Value> {
    let strategies: [fn(&str) -> Option<Value>; 5] = [
        parse_strict,
        parse_fenced_block,
        parse_fences_stripped,
        parse_trailing_commas_removed,
        parse_brace_span,
    ];

    for (i, strategy) in strategies.iter().enumerate() {
        if let Some(value) = strategy(raw) {
            debug!("Extracted JSON via strategy {}", i + 1);
            return Some(value);
        }
    }
    None
}

fn as_object(value: Value) -> Option<Value> {
    value.is_object().then_some(value)
}

/// 1. The trimmed text is already valid JSON.
fn parse_strict(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok().and_then(as_object)
}

/// 2. Interior of the first fenced code block.
fn parse_fenced_block(raw: &str) -> Option<Value> {
    let captures = FENCED_BLOCK_RE.captures(raw)?;
    serde_json::from_str(captures.get(1)?.as_str().trim())
        .ok()
        .and_then(as_object)
}

/// 3. All fence markers removed, whatever remains parsed whole.
fn parse_fences_stripped(raw: &str) -> Option<Value> {
    let stripped = FENCE_MARKER_RE.replace_all(raw, "");
    serde_json::from_str(stripped.trim()).ok().and_then(as_object)
}

/// 4. Fences removed, then trailing commas before `}` or `]` deleted.
fn parse_trailing_commas_removed(raw: &str) -> Option<Value> {
    let stripped = FENCE_MARKER_RE.replace_all(raw, "");
    let repaired = TRAILING_COMMA_RE.replace_all(stripped.trim(), "$1");
    serde_json::from_str(&repaired).ok().and_then(as_object)
}

/// 5. The span from the first `{` to the last `}`, with a trailing-comma
/// retry. Recovers JSON embedded in surrounding prose.
fn parse_brace_span(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let span = &raw[start..=end];
    if let Some(value) = serde_json::from_str(span).ok().and_then(as_object) {
        return Some(value);
    }
    let repaired = TRAILING_COMMA_RE.replace_all(span, "$1");
    serde_json::from_str(&repaired).ok().and_then(as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json() {
        let out = extract_json(r#"{"summary": {"narrative": "calm"}}"#).unwrap();
        assert_eq!(out["summary"]["narrative"], "calm");
    }

    #[test]
    fn test_strict_with_whitespace() {
        let out = extract_json("  \n {\"a\": 1} \n ").unwrap();
        assert_eq!(out, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_block_with_language_tag() {
        let raw = "Here you go:\n```json\n{\"a\": 1}\n```\nHope that helps!";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_fenced_block_without_tag() {
        let raw = "```\n{\"a\": [1, 2]}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_trailing_comma_in_object_and_array() {
        let raw = r#"{"items": [1, 2,], "n": 3,}"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"items": [1, 2], "n": 3}));
    }

    #[test]
    fn test_fenced_with_trailing_comma() {
        let raw = "```json\n{\"a\": 1,}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_embedded_in_prose() {
        let raw = "The analysis is as follows: {\"a\": 1} and that is all.";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_embedded_with_trailing_comma() {
        let raw = "Result: {\"a\": [1,],} done.";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": [1]}));
    }

    #[test]
    fn test_no_braces_returns_none() {
        assert!(extract_json("no json here at all").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn test_bare_array_rejected() {
        assert!(extract_json("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_bare_scalar_rejected() {
        assert!(extract_json("42").is_none());
        assert!(extract_json("\"a string\"").is_none());
    }

    #[test]
    fn test_unrecoverable_damage_returns_none() {
        assert!(extract_json("{\"a\": }{{{").is_none());
    }

    #[test]
    fn test_nested_object_preserved() {
        let raw = "```json\n{\"languages\": {\"en\": {\"confidenceAvg\": 0.8}}}\n```";
        let out = extract_json(raw).unwrap();
        assert_eq!(out["languages"]["en"]["confidenceAvg"], 0.8);
    }
}

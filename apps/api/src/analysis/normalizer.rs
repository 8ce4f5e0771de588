//! Response Normalizer — pulls one JSON object out of free-form model output.
//!
//! Models wrap JSON in markdown fences or surround it with chatter. Each
//! `Strategy` proposes one candidate substring; the first candidate that
//! parses as a JSON object wins.

use serde_json::{Map, Value};
use thiserror::Error;

/// Diagnostic snippets are cut to this many characters.
const SNIPPET_CHARS: usize = 200;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no JSON object found in model output: {raw_snippet}")]
    Unparseable { raw_snippet: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Between a ```json marker and the next fence close.
    JsonFence,
    /// Between the first pair of ``` fences.
    AnyFence,
    /// The whole input.
    Raw,
    /// First `{` through last `}`.
    BraceSpan,
}

/// Evaluation order. First success wins.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy::JsonFence,
    Strategy::AnyFence,
    Strategy::Raw,
    Strategy::BraceSpan,
];

impl Strategy {
    /// The substring this strategy would try to parse, if it applies at all.
    pub fn candidate(self, raw: &str) -> Option<&str> {
        match self {
            Strategy::JsonFence => fenced_after(raw, JSON_FENCE),
            Strategy::AnyFence => fenced_after(raw, FENCE),
            Strategy::Raw => Some(raw),
            Strategy::BraceSpan => {
                let start = raw.find('{')?;
                let end = raw.rfind('}')?;
                (start < end).then(|| &raw[start..=end])
            }
        }
    }

    pub fn apply(self, raw: &str) -> Option<Map<String, Value>> {
        self.candidate(raw).and_then(parse_object)
    }
}

/// Text after `opener` up to the next fence; an unclosed fence runs to the end.
fn fenced_after<'a>(raw: &'a str, opener: &str) -> Option<&'a str> {
    let start = raw.find(opener)? + opener.len();
    let rest = &raw[start..];
    Some(match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    })
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy.apply(raw))
        .ok_or_else(|| ParseError::Unparseable {
            raw_snippet: snippet(raw),
        })
}

fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expected() -> Map<String, Value> {
        json!({"a": 1}).as_object().cloned().unwrap()
    }

    #[test]
    fn test_json_fence() {
        let raw = "Sure!\n```json\n{\"a\":1}\n```\nAnything else?";
        assert_eq!(extract_json_object(raw).unwrap(), expected());
    }

    #[test]
    fn test_bare_fence() {
        let raw = "```\n{\"a\":1}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), expected());
    }

    #[test]
    fn test_raw_object() {
        assert_eq!(extract_json_object("{\"a\":1}").unwrap(), expected());
        assert_eq!(extract_json_object("  {\"a\":1}\n").unwrap(), expected());
    }

    #[test]
    fn test_noisy_text() {
        let raw = "here you go: {\"a\":1} thanks";
        assert_eq!(extract_json_object(raw).unwrap(), expected());
    }

    #[test]
    fn test_garbage_is_unparseable() {
        let err = extract_json_object("no json here, sorry").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unparseable {
                raw_snippet: "no json here, sorry".to_string()
            }
        );
    }

    #[test]
    fn test_snippet_is_bounded() {
        let raw = "x".repeat(1000);
        let ParseError::Unparseable { raw_snippet } = extract_json_object(&raw).unwrap_err();
        assert_eq!(raw_snippet.chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("```json\n\"text\"\n```").is_err());
    }

    #[test]
    fn test_broken_fence_falls_back_to_brace_span() {
        // Fenced content is not valid JSON on its own; the brace span is.
        let raw = "```json\nresult: {\"a\":1}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), expected());
    }

    #[test]
    fn test_unclosed_json_fence() {
        let raw = "```json\n{\"a\":1}";
        assert_eq!(Strategy::JsonFence.apply(raw).unwrap(), expected());
    }

    #[test]
    fn test_strategy_candidates() {
        let raw = "intro ```json {\"a\":1} ``` outro";
        assert_eq!(
            Strategy::JsonFence.candidate(raw).map(str::trim),
            Some("{\"a\":1}")
        );
        assert_eq!(
            Strategy::AnyFence.candidate(raw).map(str::trim),
            Some("json {\"a\":1}")
        );
        assert_eq!(Strategy::BraceSpan.candidate(raw), Some("{\"a\":1}"));
        assert_eq!(Strategy::BraceSpan.candidate("} backwards {"), None);
    }
}

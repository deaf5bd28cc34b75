use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_-]*\s*").expect("valid regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum MalformedOutput {
    #[error("model output is not valid JSON: {0}")]
    Unparseable(String),
    #[error("model output is JSON but not an object: {0}")]
    NotAnObject(String),
}

pub fn strip_code_fences(raw: &str) -> &str {
    let start = OPENING_FENCE.find(raw).map(|m| m.end()).unwrap_or(0);
    let rest = &raw[start..];
    let end = CLOSING_FENCE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    rest[..end].trim()
}

pub fn parse_strict(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate).ok()
}

/// Parses the span from the first `{` to the last `}`, inclusive.
pub fn parse_brace_span(candidate: &str) -> Option<Value> {
    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end < start {
        return None;
    }
    parse_strict(&candidate[start..=end])
}

/// Fence stripping, then a strict parse, then the brace span. First success wins.
pub fn repair_json(raw: &str) -> Result<Map<String, Value>, MalformedOutput> {
    let cleaned = strip_code_fences(raw);
    let value = parse_strict(cleaned)
        .or_else(|| parse_brace_span(cleaned))
        .ok_or_else(|| MalformedOutput::Unparseable(preview(raw)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(MalformedOutput::NotAnObject(preview(&other.to_string()))),
    }
}

fn preview(raw: &str) -> String {
    raw.chars().take(200).collect()
}

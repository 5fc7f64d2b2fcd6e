//! Locating the JSON object inside a free-form model response

use crate::error::ExtractionError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n?(.*?)```").expect("valid fence pattern"))
}

/// Pull a JSON object out of model output.
///
/// A fenced code block wins when present; otherwise the span from the first
/// `{` to the last `}` is parsed.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    let candidate = match fence_pattern().captures(text).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => brace_span(text).ok_or(ExtractionError::NoJsonObject)?,
    };

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    if value.is_object() {
        Ok(value)
    } else {
        Err(ExtractionError::NotAnObject(json_kind(&value).to_string()))
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

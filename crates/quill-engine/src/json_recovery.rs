//! Best-effort JSON object recovery from free-text model output.
//!
//! Models wrap JSON in prose, code fences, or trailing commentary. Strategies
//! are tried in order and the first that yields a JSON object wins:
//!
//! 1. parse the trimmed output directly;
//! 2. parse the first balanced top-level `{...}` span;
//! 3. strip code-fence markers and parse again.

use serde_json::{Map, Value};

/// Recover a JSON object using every strategy in order.
#[must_use]
pub fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let trimmed = raw.trim();
    as_object(trimmed)
        .or_else(|| first_object_span(trimmed).and_then(as_object))
        .or_else(|| {
            let stripped = strip_code_fences(trimmed);
            as_object(&stripped).or_else(|| first_object_span(&stripped).and_then(as_object))
        })
}

/// Recover a JSON object from the first balanced `{...}` span only.
#[must_use]
pub fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    first_object_span(raw).and_then(as_object)
}

fn as_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// The first top-level `{...}` span, found by bracket matching.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count. Returns `None` if no opening brace is ever closed.
#[must_use]
pub fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove Markdown code-fence lines (```` ``` ```` and ```` ```json ````).
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Whether a JSON value is falsy: null, false, zero, or a blank string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Read `key` as a list of strings, dropping falsy entries.
///
/// A bare non-empty string is treated as a one-element list.
#[must_use]
pub fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !is_falsy(v))
            .map(value_text)
            .collect(),
        Some(v @ Value::String(_)) if !is_falsy(v) => vec![value_text(v)],
        _ => Vec::new(),
    }
}

/// Read the first present key among `keys` as free text. Arrays are joined
/// with `"; "`. Missing or null values give an empty string.
#[must_use]
pub fn text_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    let Some(value) = keys.iter().find_map(|k| object.get(*k)) else {
        return String::new();
    };
    match value {
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !is_falsy(v))
            .map(value_text)
            .collect::<Vec<_>>()
            .join("; "),
        other => value_text(other),
    }
}

//! JSON extraction from model replies.
//!
//! Models return JSON raw, inside fenced code blocks, or embedded in prose.
//! [`extract_json`] handles all three; the `field_*` helpers pull typed
//! values out with [`ModeError`]s naming the missing or bad field.

use serde_json::Value;

use crate::error::ModeError;

/// Extract a JSON value from a model reply.
///
/// # Errors
///
/// Returns [`ModeError::JsonParseFailed`] if no valid JSON can be found.
///
/// # Examples
///
/// ```
/// use mcp_brain::generator::extract_json;
///
/// let json = extract_json(r#"{"key": "value"}"#).unwrap();
/// assert_eq!(json["key"], "value");
///
/// let json = extract_json("Sure:\n```json\n{\"key\": 1}\n```").unwrap();
/// assert_eq!(json["key"], 1);
///
/// assert!(extract_json("not json").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<Value, ModeError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(block) = fenced_block(trimmed, "```json") {
        return parse_with_preview(&block, text);
    }

    if let Some(block) = fenced_block(trimmed, "```") {
        return parse_with_preview(&block, text);
    }

    if let Some(embedded) =
        balanced(trimmed, '{', '}').or_else(|| balanced(trimmed, '[', ']'))
    {
        return parse_with_preview(&embedded, text);
    }

    Err(ModeError::JsonParseFailed {
        message: format!("No valid JSON found in response: {}", preview(text, 100)),
    })
}

fn fenced_block(text: &str, fence: &str) -> Option<String> {
    let start = text.find(fence)? + fence.len();
    let rest = text[start..].trim_start();
    let end = rest.find("```")?;
    let body = rest[..end].trim();
    (!body.is_empty()).then(|| body.to_string())
}

fn balanced(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let mut depth = 0_i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if !in_string && c == open => depth += 1,
            c if !in_string && c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..=start + i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_with_preview(json: &str, original: &str) -> Result<Value, ModeError> {
    serde_json::from_str(json).map_err(|e| ModeError::JsonParseFailed {
        message: format!("Failed to parse JSON: {e}. Preview: {}", preview(original, 100)),
    })
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// Required non-empty string field.
///
/// # Errors
///
/// Returns [`ModeError::MissingField`] if absent, not a string, or blank.
pub fn field_str(value: &Value, field: &str) -> Result<String, ModeError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ModeError::MissingField {
            field: field.to_string(),
        })
}

/// Optional confidence field, clamped to `[0, 1]`.
///
/// Numbers and numeric strings are accepted; anything else yields `default`.
#[must_use]
pub fn field_confidence(value: &Value, field: &str, default: f64) -> f64 {
    let raw = match value.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    crate::session::clamp_confidence(raw.unwrap_or(default))
}

/// Optional list of strings. Non-string entries are skipped.
#[must_use]
pub fn field_string_list(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

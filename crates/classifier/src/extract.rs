//! Tolerant JSON extraction from LLM responses.
//!
//! Models wrap JSON in prose and code fences no matter how firmly the
//! prompt forbids it. Extraction tries a direct parse first, then the
//! contents of a fenced code block, then the first balanced object or
//! array embedded in the text.

use serde_json::Value;

/// Extract the first JSON object from a response.
pub fn extract_json_object(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    balanced_slice(trimmed, '{', '}')
        .and_then(|slice| serde_json::from_str::<Value>(slice).ok())
        .filter(Value::is_object)
}

/// Extract the first JSON array from a response.
pub fn extract_json_array(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_array() {
            return Some(value);
        }
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            if value.is_array() {
                return Some(value);
            }
        }
    }

    balanced_slice(trimmed, '[', ']')
        .and_then(|slice| serde_json::from_str::<Value>(slice).ok())
        .filter(Value::is_array)
}

/// Contents of the first ``` fence, tolerating a `json` language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// First `open`..`close` balanced slice, skipping delimiters inside
/// JSON strings.
fn balanced_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

//! Coercion rules behind the typed getters.
//!
//! Every function returns `None` when the value cannot be coerced; the
//! getters hand that back to the caller, who picks the default.

use serde_json::{Map, Value};

const TRUE_TOKENS: [&str; 4] = ["true", "yes", "1", "on"];
const FALSE_TOKENS: [&str; 4] = ["false", "no", "0", "off"];

/// Numbers and numeric strings. Floats are truncated toward zero.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Booleans pass through, numbers are true when non-zero and strings must
/// be one of the recognised tokens (case-insensitive, surrounding whitespace
/// ignored).
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let token = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Some(true)
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// Strings as-is, any other non-null value as compact JSON.
pub fn to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Arrays as-is; strings are split on `,` with each piece trimmed.
pub fn to_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::String(s) => Some(
            s.split(',')
                .map(|piece| Value::String(piece.trim().to_string()))
                .collect(),
        ),
        _ => None,
    }
}

pub fn to_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which no longer fits
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Names the JSON type of `value`, for error messages and logs.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

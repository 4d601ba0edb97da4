//! Utility functions for working with serde_json::Value

use serde_json::{Number, Value};

/// Get the type name of a Value for log fields and error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract f64 from Number, trying both f64 and i64 representations
#[inline]
pub fn number_as_f64(num: &Number) -> Option<f64> {
    num.as_f64().or_else(|| num.as_i64().map(|i| i as f64))
}

/// Parse a string the way form input is usually read as a number.
///
/// Accepts optional surrounding whitespace, a sign, a fractional part and
/// an exponent. Hex, `inf` and `nan` are rejected.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = trimmed.trim_start_matches(['+', '-']);
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if digits
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
    {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric view of a value: numbers as-is, numeric strings parsed.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => number_as_f64(n),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// Render a value for interpolation into a message.
///
/// Strings are used verbatim, numbers in their JSON form, arrays and objects
/// as compact JSON. Booleans and null render as an empty string.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        Value::Bool(_) | Value::Null => String::new(),
    }
}

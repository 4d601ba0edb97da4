//! Type rules

use serde_json::Value;

use crate::macros::rule;

rule! {
    /// `true`, `false`, `0`, `1`, `"0"` or `"1"`.
    pub Boolean => "boolean";
    message "The :attribute must be a boolean";
    check(value) {
        match value {
            Value::Bool(_) => true,
            Value::Number(n) => matches!(n.as_u64(), Some(0 | 1)),
            Value::String(s) => matches!(s.as_str(), "0" | "1"),
            _ => false,
        }
    }
    fn boolean();
}

rule! {
    /// An array or an object.
    pub Array => "array";
    message "The :attribute must be array";
    check(value) { value.is_array() || value.is_object() }
    fn array();
}

//! Presence rules
//!
//! Most of these are implicit: they run even when the value is empty and
//! a failure stops the rest of the attribute's chain.

use serde_json::Value;

use crate::macros::rule;
use crate::rules::loose_eq;

// ============================================================================
// REQUIRED
// ============================================================================

rule! {
    /// The value must be present and not empty.
    pub Required => "required";
    message "The :attribute is required";
    implicit true;
    check(value) { !Required::is_empty_value(value) }
    fn required();
}

impl Required {
    /// Empty means null, a string that is blank after trimming, or an
    /// empty array or object. `0` and `false` are not empty.
    #[must_use]
    pub fn is_empty_value(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }
}

rule! {
    /// Required when another field equals one of the given values.
    pub RequiredIf => "required_if" ["field", "value"];
    message "The :attribute is required if :field has value :value";
    implicit true;
    check(self, value, ctx) {
        self.params.require(Self::KEY, &["field", "value"])?;
        let field = self.params.value(Self::KEY, "field")?;
        let other = ctx.value(field).unwrap_or(&Value::Null);

        let mut expected = self
            .params
            .get("value")
            .into_iter()
            .chain(self.params.rest().iter().map(String::as_str));

        if expected.any(|candidate| loose_eq(other, candidate)) {
            Ok(!Required::is_empty_value(value))
        } else {
            Ok(true)
        }
    }
    fn required_if(field, value);
}

rule! {
    /// Required when any of the other fields is present and not empty.
    pub RequiredWith => "required_with" ["field"];
    message "The :attribute must be present when :field is present";
    implicit true;
    check(self, value, ctx) {
        let first = self.params.value(Self::KEY, "field")?;
        let triggered = std::iter::once(first)
            .chain(self.params.rest().iter().map(String::as_str))
            .any(|field| ctx.value(field).is_some_and(|other| !Required::is_empty_value(other)));

        Ok(!triggered || !Required::is_empty_value(value))
    }
    fn required_with(field);
}

rule! {
    /// The key must exist in the input; null and empty values pass.
    pub Present => "present" [];
    message "The :attribute must be present";
    implicit true;
    check(self, value, ctx) { Ok(ctx.has(ctx.attribute())) }
    fn present();
}

rule! {
    /// The value must be `yes`, `on`, `1` or `true`.
    pub Accepted => "accepted";
    message "The :attribute must be accepted";
    implicit true;
    check(value) {
        match value {
            Value::Bool(flag) => *flag,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1" | "true"),
            _ => false,
        }
    }
    fn accepted();
}

rule! {
    /// Marks the attribute as optional: empty values skip every rule.
    pub Nullable => "nullable";
    message "The :attribute must be filled";
    check(value) { true }
    fn nullable();
}

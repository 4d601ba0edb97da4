//! The rule trait and the context a rule runs in

use std::fmt;

use serde_json::Value;
use sieve_support::arr;

use crate::foundation::{Parameters, ValidatorError};

/// A single validation rule.
///
/// Rules are resolved once per attribute and then run against every
/// concrete attribute the key expands to, so implementations may keep
/// state between calls (see `distinct`). That state is reset in
/// [`before_validate`](Self::before_validate).
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use sieve_validator::foundation::{Parameters, Rule, RuleContext, ValidatorError};
///
/// #[derive(Debug, Default)]
/// struct Even {
///     params: Parameters,
/// }
///
/// impl Rule for Even {
///     fn key(&self) -> &str {
///         "even"
///     }
///
///     fn message(&self) -> &str {
///         "The :attribute must be even."
///     }
///
///     fn parameters(&self) -> &Parameters {
///         &self.params
///     }
///
///     fn check(&mut self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
///         Ok(value.as_i64().is_some_and(|n| n % 2 == 0))
///     }
/// }
///
/// let input = json!({ "n": 4 });
/// let ctx = RuleContext::new("n", "n", &[], &input);
/// assert!(Even::default().check(&json!(4), &ctx).unwrap());
/// ```
pub trait Rule: fmt::Debug + Send {
    /// Registry key, also the error bag key for failures.
    fn key(&self) -> &str;

    /// Default message template.
    fn message(&self) -> &str;

    /// Bound parameters, substituted into messages as `:name`.
    fn parameters(&self) -> &Parameters;

    /// Extra `(placeholder, text)` pairs for messages.
    fn parameter_texts(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Implicit rules run on empty values and stop the chain on failure.
    fn is_implicit(&self) -> bool {
        false
    }

    /// Called once per validation run before any attribute is checked.
    fn before_validate(&mut self) {}

    /// Checks one value. `Ok(false)` is a validation failure; `Err` is a
    /// misconfigured rule and aborts the run.
    fn check(&mut self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, ValidatorError>;
}

/// Looks up how many stored records match a value.
///
/// Backs the `unique` and `exists` rules.
pub trait PresenceVerifier: Send + Sync {
    /// Counts rows in `collection` whose `column` equals `value`, ignoring
    /// the row identified by `exclude`.
    fn count(&self, collection: &str, column: &str, value: &Value, exclude: Option<&str>) -> usize;
}

/// Where a rule is being checked: the concrete attribute, the wildcard
/// attribute it came from, and the whole input.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    attribute: &'a str,
    primary: &'a str,
    captures: &'a [String],
    inputs: &'a Value,
    presence: Option<&'a dyn PresenceVerifier>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context without a presence verifier.
    #[must_use]
    pub fn new(attribute: &'a str, primary: &'a str, captures: &'a [String], inputs: &'a Value) -> Self {
        Self {
            attribute,
            primary,
            captures,
            inputs,
            presence: None,
        }
    }

    /// Attaches a presence verifier.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_presence(mut self, presence: Option<&'a dyn PresenceVerifier>) -> Self {
        self.presence = presence;
        self
    }

    /// Concrete attribute key, e.g. `users.0.email`.
    #[must_use]
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// Key the attribute was declared under, e.g. `users.*.email`.
    #[must_use]
    pub fn primary(&self) -> &'a str {
        self.primary
    }

    /// Values matched by the wildcards of the primary key.
    #[must_use]
    pub fn captures(&self) -> &'a [String] {
        self.captures
    }

    /// The whole input being validated.
    #[must_use]
    pub fn inputs(&self) -> &'a Value {
        self.inputs
    }

    /// The configured presence verifier, if any.
    #[must_use]
    pub fn presence(&self) -> Option<&'a dyn PresenceVerifier> {
        self.presence
    }

    /// Substitutes `*` segments of `path` with this attribute's captures,
    /// left to right. Wildcards without a capture stay as they are.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> String {
        if !path.contains('*') {
            return path.to_owned();
        }
        let mut captures = self.captures.iter();
        path.split(arr::DELIMITER)
            .map(|segment| match segment {
                "*" => captures.next().map_or("*", String::as_str),
                other => other,
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Reads another field of the input, resolving wildcards first.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&'a Value> {
        arr::get(self.inputs, &self.resolve_path(path))
    }

    /// Returns true when the field exists in the input, even as null.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        arr::has(self.inputs, &self.resolve_path(path))
    }
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("attribute", &self.attribute)
            .field("primary", &self.primary)
            .field("captures", &self.captures)
            .field("presence", &self.presence.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_wildcards_from_captures() {
        let input = json!({ "users": [{ "name": "a" }, { "name": "b" }] });
        let captures = vec!["1".to_string()];
        let ctx = RuleContext::new("users.1.email", "users.*.email", &captures, &input);

        assert_eq!(ctx.resolve_path("users.*.name"), "users.1.name");
        assert_eq!(ctx.value("users.*.name"), Some(&json!("b")));
        assert!(!ctx.has("users.*.email"));
    }

    #[test]
    fn uncaptured_wildcards_are_kept() {
        let input = json!({});
        let ctx = RuleContext::new("a", "a", &[], &input);
        assert_eq!(ctx.resolve_path("x.*.y"), "x.*.y");
        assert_eq!(ctx.resolve_path("plain"), "plain");
    }

    #[test]
    fn has_sees_present_null() {
        let input = json!({ "note": null });
        let ctx = RuleContext::new("note", "note", &[], &input);
        assert!(ctx.has("note"));
        assert_eq!(ctx.value("note"), Some(&Value::Null));
    }
}

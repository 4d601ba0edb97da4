//! Rules comparing the value against a list or other fields

use std::borrow::Cow;

use serde_json::Value;
use sieve_support::arr;

use crate::engine::PathPattern;
use crate::foundation::{Parameters, Rule, RuleContext, ValidatorError};
use crate::macros::rule;
use crate::rules::loose_eq;

/// Joins list values for messages: `a, b or c`.
fn humanize_list(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

/// Every element of an array or object value, or the value itself.
fn members(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        other => vec![other],
    }
}

// ============================================================================
// IN / NOT IN
// ============================================================================

/// The value, or every element of it, must be one of the listed values.
#[derive(Debug, Clone)]
pub struct In {
    params: Parameters,
    message: Cow<'static, str>,
}

impl In {
    pub const KEY: &'static str = "in";
    pub const MESSAGE: &'static str = "The :attribute only allows :allowed_values";

    #[must_use]
    pub fn from_args(args: &[String]) -> Self {
        Self {
            params: Parameters::bind(&[], args),
            message: Cow::Borrowed(Self::MESSAGE),
        }
    }

    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let args: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        Self::from_args(&args)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for In {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn parameter_texts(&self) -> Vec<(String, String)> {
        vec![("allowed_values".to_owned(), humanize_list(self.params.rest()))]
    }

    fn check(&mut self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
        let allowed = self.params.rest();
        Ok(members(value)
            .into_iter()
            .all(|member| allowed.iter().any(|candidate| loose_eq(member, candidate))))
    }
}

/// The value, and every element of it, must not be one of the listed values.
#[derive(Debug, Clone)]
pub struct NotIn {
    params: Parameters,
    message: Cow<'static, str>,
}

impl NotIn {
    pub const KEY: &'static str = "not_in";
    pub const MESSAGE: &'static str = "The :attribute is not allowing :disallowed_values";

    #[must_use]
    pub fn from_args(args: &[String]) -> Self {
        Self {
            params: Parameters::bind(&[], args),
            message: Cow::Borrowed(Self::MESSAGE),
        }
    }

    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let args: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        Self::from_args(&args)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for NotIn {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn parameter_texts(&self) -> Vec<(String, String)> {
        vec![("disallowed_values".to_owned(), humanize_list(self.params.rest()))]
    }

    fn check(&mut self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
        let disallowed = self.params.rest();
        Ok(!members(value)
            .into_iter()
            .any(|member| disallowed.iter().any(|candidate| loose_eq(member, candidate))))
    }
}

// ============================================================================
// FIELD COMPARISON
// ============================================================================

rule! {
    /// Equal to another field.
    pub Same => "same" ["field"];
    message "The :attribute must be same with :field";
    check(self, value, ctx) {
        let field = self.params.value(Self::KEY, "field")?;
        Ok(ctx.value(field).unwrap_or(&Value::Null) == value)
    }
    fn same(field);
}

rule! {
    /// Not equal to another field.
    pub Different => "different" ["field"];
    message "The :attribute must be different with :field";
    check(self, value, ctx) {
        let field = self.params.value(Self::KEY, "field")?;
        Ok(ctx.value(field).unwrap_or(&Value::Null) != value)
    }
    fn different(field);
}

// ============================================================================
// DISTINCT
// ============================================================================

/// No other value matched by the same wildcard key may equal this one.
///
/// For a key without wildcards the value's own elements must be unique.
/// Sibling values are collected on first use and dropped in
/// [`before_validate`](Rule::before_validate).
#[derive(Debug, Clone, Default)]
pub struct Distinct {
    params: Parameters,
    message: Option<Cow<'static, str>>,
    siblings: Option<Vec<Value>>,
}

impl Distinct {
    pub const KEY: &'static str = "distinct";
    pub const MESSAGE: &'static str = "The :attribute has a duplicate value";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn collect_siblings(ctx: &RuleContext<'_>) -> Vec<Value> {
        PathPattern::compile(ctx.primary())
            .expand(ctx.inputs())
            .into_iter()
            .filter_map(|expansion| arr::get(ctx.inputs(), expansion.path()).cloned())
            .collect()
    }
}

impl Rule for Distinct {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(Self::MESSAGE)
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn before_validate(&mut self) {
        self.siblings = None;
    }

    fn check(&mut self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
        if !ctx.primary().contains('*') {
            let members = members(value);
            let unique = members
                .iter()
                .enumerate()
                .all(|(i, member)| !members[..i].contains(member));
            return Ok(unique);
        }

        let siblings = self
            .siblings
            .get_or_insert_with(|| Self::collect_siblings(ctx));
        Ok(siblings.iter().filter(|sibling| *sibling == value).count() <= 1)
    }
}

#[must_use]
pub fn distinct() -> Distinct {
    Distinct::new()
}

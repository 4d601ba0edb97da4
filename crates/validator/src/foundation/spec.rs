//! Rule specifications as written by callers
//!
//! An attribute's rules are given either as a piped string
//! (`"required|email|max:255"`), a list of string rules, rule objects, or
//! a mix of those. A [`RuleSet`] holds them unresolved until the
//! registry turns names into rule instances.

use std::fmt;

use serde_json::Value;

use crate::foundation::{Rule, RuleContext, ValidatorError, ValidatorResult};
use crate::rules::Callback;

/// Name of the one rule whose parameter is never split on commas.
const REGEX_RULE: &str = "regex";

/// One entry of an attribute's rule list.
pub enum RuleSpec {
    /// String form, `name` or `name:arg1,arg2`.
    Named(String),
    /// A ready-made rule instance.
    Rule(Box<dyn Rule>),
}

impl RuleSpec {
    /// Wraps a rule instance.
    pub fn rule(rule: impl Rule + 'static) -> Self {
        Self::Rule(Box::new(rule))
    }

    /// Wraps a closure as a `callback` rule.
    pub fn callback<F>(check: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::rule(Callback::new(check))
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(text) => f.debug_tuple("Named").field(text).finish(),
            Self::Rule(rule) => f.debug_tuple("Rule").field(&rule.key()).finish(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(text: &str) -> Self {
        Self::Named(text.to_owned())
    }
}

impl From<String> for RuleSpec {
    fn from(text: String) -> Self {
        Self::Named(text)
    }
}

impl From<Box<dyn Rule>> for RuleSpec {
    fn from(rule: Box<dyn Rule>) -> Self {
        Self::Rule(rule)
    }
}

/// Ordered rule list of one attribute.
#[derive(Debug, Default)]
pub struct RuleSet(Vec<RuleSpec>);

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a piped rule string. Empty pieces are dropped.
    ///
    /// ```
    /// use sieve_validator::foundation::RuleSet;
    ///
    /// let rules = RuleSet::parse("required||max:10|");
    /// assert_eq!(rules.len(), 2);
    /// ```
    #[must_use]
    pub fn parse(piped: &str) -> Self {
        piped
            .split('|')
            .filter(|piece| !piece.is_empty())
            .map(RuleSpec::from)
            .collect()
    }

    /// Appends a rule in string or object form.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, spec: impl Into<RuleSpec>) -> Self {
        self.0.push(spec.into());
        self
    }

    /// Appends a rule instance.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(self, rule: impl Rule + 'static) -> Self {
        self.with(RuleSpec::rule(rule))
    }

    /// Appends a closure rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn callback<F>(self, check: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.with(RuleSpec::callback(check))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.0.iter()
    }
}

impl IntoIterator for RuleSet {
    type Item = RuleSpec;
    type IntoIter = std::vec::IntoIter<RuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<RuleSpec> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&str> for RuleSet {
    fn from(piped: &str) -> Self {
        Self::parse(piped)
    }
}

impl From<String> for RuleSet {
    fn from(piped: String) -> Self {
        Self::parse(&piped)
    }
}

impl<S: Into<RuleSpec>, const N: usize> From<[S; N]> for RuleSet {
    fn from(specs: [S; N]) -> Self {
        specs.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<RuleSpec>> From<Vec<S>> for RuleSet {
    fn from(specs: Vec<S>) -> Self {
        specs.into_iter().map(Into::into).collect()
    }
}

/// Splits a string rule into its name and arguments.
///
/// The name ends at the first `:`. Arguments are split on `,` except for
/// `regex`, whose pattern may contain commas.
///
/// ```
/// use sieve_validator::foundation::parse_rule;
///
/// let (name, args) = parse_rule("age", "between:18,65").unwrap();
/// assert_eq!(name, "between");
/// assert_eq!(args, ["18", "65"]);
///
/// let (_, args) = parse_rule("code", "regex:/^[a-z]{2,4}$/").unwrap();
/// assert_eq!(args, ["/^[a-z]{2,4}$/"]);
/// ```
pub fn parse_rule<'a>(attribute: &str, text: &'a str) -> ValidatorResult<(&'a str, Vec<String>)> {
    let (name, args) = match text.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (text, None),
    };

    if name.is_empty() {
        return Err(ValidatorError::InvalidRuleSpec {
            attribute: attribute.to_owned(),
            reason: format!("rule `{text}` has no name"),
        });
    }

    let args = match args {
        None => Vec::new(),
        Some(args) if name == REGEX_RULE => vec![args.to_owned()],
        Some(args) => args.split(',').map(str::to_owned).collect(),
    };

    Ok((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piped_string_skips_empty_pieces() {
        let rules = RuleSet::from("required|email||max:255");
        let names: Vec<_> = rules
            .iter()
            .map(|spec| match spec {
                RuleSpec::Named(text) => text.as_str(),
                RuleSpec::Rule(rule) => rule.key(),
            })
            .collect();
        assert_eq!(names, ["required", "email", "max:255"]);
    }

    #[test]
    fn list_entries_are_not_split_on_pipes() {
        let rules = RuleSet::from(["regex:/a|b/", "required"]);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn parse_rule_without_args() {
        let (name, args) = parse_rule("a", "required").unwrap();
        assert_eq!(name, "required");
        assert!(args.is_empty());
    }

    #[test]
    fn parse_rule_keeps_empty_args() {
        let (name, args) = parse_rule("a", "in:,x").unwrap();
        assert_eq!(name, "in");
        assert_eq!(args, ["", "x"]);
    }

    #[test]
    fn parse_rule_regex_keeps_commas_and_colons() {
        let (_, args) = parse_rule("a", "regex:/^\\d{1,3}:\\d+$/").unwrap();
        assert_eq!(args, ["/^\\d{1,3}:\\d+$/"]);
    }

    #[test]
    fn parse_rule_rejects_missing_name() {
        let err = parse_rule("email", ":5").unwrap_err();
        assert_eq!(err.code(), "RULE_INVALID_SPEC");
    }
}

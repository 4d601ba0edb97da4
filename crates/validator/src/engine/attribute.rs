//! Attributes under validation

use std::fmt;

use crate::engine::PathPattern;
use crate::foundation::Rule;
use crate::rules::{Nullable, Required};

/// A key of the input together with its resolved rules.
///
/// Keys containing `*` are primary attributes: they are expanded against
/// the input on every run and their rules are shared by all the concrete
/// keys they produce.
pub struct Attribute {
    pattern: PathPattern,
    rules: Vec<Box<dyn Rule>>,
    alias: Option<String>,
}

impl Attribute {
    #[must_use]
    pub fn new(key: &str, rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            pattern: PathPattern::compile(key),
            rules,
            alias: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }

    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub(crate) fn rules_mut(&mut self) -> &mut [Box<dyn Rule>] {
        &mut self.rules
    }

    #[must_use]
    pub fn has_rule(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.key() == key)
    }

    /// Whether the attribute carries `required`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.has_rule(Required::KEY)
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.has_rule(Nullable::KEY)
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.pattern.has_wildcard()
    }

    /// A rule may be skipped on an empty value unless the attribute is
    /// required or the rule is implicit.
    pub(crate) fn is_optional(&self, rule: &dyn Rule) -> bool {
        !self.is_required() && !rule.is_implicit() && rule.key() != Required::KEY
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("key", &self.key())
            .field("rules", &self.rules.iter().map(|r| r.key()).collect::<Vec<_>>())
            .field("alias", &self.alias)
            .finish()
    }
}

/// Readable form of a key for messages.
///
/// Segments are split on dots, `snake_case` and `camelCase` words are
/// spaced out and lowercased, and the first letter is capitalised. For
/// keys produced by a wildcard, numeric segments count from one.
///
/// ```
/// use sieve_validator::engine::humanize;
///
/// assert_eq!(humanize("first_name", false), "First name");
/// assert_eq!(humanize("users.0.emailAddress", true), "Users 1 email address");
/// assert_eq!(humanize("items.0", false), "Items 0");
/// ```
#[must_use]
pub fn humanize(key: &str, from_wildcard: bool) -> String {
    let words: Vec<String> = key
        .split('.')
        .map(|segment| match segment.parse::<u64>() {
            Ok(n) if from_wildcard => n.checked_add(1).map_or_else(|| segment.to_owned(), |m| m.to_string()),
            _ => spaced_lowercase(segment),
        })
        .collect();

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn spaced_lowercase(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    for c in word.chars() {
        if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

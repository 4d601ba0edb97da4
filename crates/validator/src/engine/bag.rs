//! Collected validation failures

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::PathPattern;

/// Rendered messages keyed by attribute, then by rule.
///
/// Lookups take a concrete key (`users.0.email`), a key with a rule
/// (`users.0.email:email`) or a wildcard key (`users.*.email`), which
/// matches every concrete key it covers.
///
/// # Examples
///
/// ```
/// use sieve_validator::engine::ErrorBag;
///
/// let mut bag = ErrorBag::new();
/// bag.add("users.0.email", "email", "The Users 1 email is not valid email");
/// bag.add("users.2.email", "required", "The Users 3 email is required");
///
/// assert_eq!(bag.count(), 2);
/// assert!(bag.has("users.*.email"));
/// assert!(bag.has("users.2.email:required"));
/// assert!(!bag.has("users.2.email:email"));
/// assert_eq!(bag.first("users.*.email"), Some("The Users 1 email is not valid email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBag {
    messages: IndexMap<String, IndexMap<String, String>>,
}

impl ErrorBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message. A second message for the same attribute and rule
    /// replaces the first.
    pub fn add(&mut self, key: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(key.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// Total number of messages.
    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.matching(key).next().is_some()
    }

    /// First message for the key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.matching(key).next().map(|(_, _, message)| message)
    }

    /// Messages for the key, grouped by concrete attribute and rule.
    #[must_use]
    pub fn get(&self, key: &str) -> IndexMap<&str, IndexMap<&str, &str>> {
        let mut out: IndexMap<&str, IndexMap<&str, &str>> = IndexMap::new();
        for (attribute, rule, message) in self.matching(key) {
            out.entry(attribute).or_default().insert(rule, message);
        }
        out
    }

    /// Every message in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        self.messages
            .values()
            .flat_map(|rules| rules.values().map(String::as_str))
            .collect()
    }

    /// The first message of each attribute.
    #[must_use]
    pub fn first_of_all(&self) -> Vec<&str> {
        self.messages
            .values()
            .filter_map(|rules| rules.values().next().map(String::as_str))
            .collect()
    }

    /// Attributes that have at least one message.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.messages.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn to_map(&self) -> IndexMap<String, IndexMap<String, String>> {
        self.messages.clone()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// `(attribute, rule, message)` for every entry a lookup key selects.
    fn matching<'a>(&'a self, key: &str) -> impl Iterator<Item = (&'a str, &'a str, &'a str)> {
        let (attribute, rule) = split_rule(key);
        let pattern = attribute.contains('*').then(|| PathPattern::compile(attribute));
        let attribute = attribute.to_owned();
        let rule = rule.map(str::to_owned);

        self.messages
            .iter()
            .filter(move |(candidate, _)| match &pattern {
                Some(pattern) => pattern.matches(candidate),
                None => **candidate == attribute,
            })
            .flat_map(move |(candidate, rules)| {
                let rule = rule.clone();
                rules
                    .iter()
                    .filter(move |(name, _)| rule.as_deref().is_none_or(|r| r == name.as_str()))
                    .map(move |(name, message)| (candidate.as_str(), name.as_str(), message.as_str()))
            })
    }
}

/// Splits `attribute:rule`. Only the last colon counts.
fn split_rule(key: &str) -> (&str, Option<&str>) {
    match key.rsplit_once(':') {
        Some((attribute, rule)) if !rule.is_empty() && !rule.contains('.') => (attribute, Some(rule)),
        _ => (key, None),
    }
}

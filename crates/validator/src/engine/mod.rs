//! The validation engine
//!
//! A [`Validation`] owns one input document and the attributes registered
//! against it. Each [`Validation::validate`] run goes through the same
//! stages:
//!
//! 1. every rule's `before_validate` hook
//! 2. wildcard expansion of each attribute against the input
//! 3. the rule chain of every concrete key, in declaration order
//! 4. the outcome and the error bag are complete
//!
//! ```
//! use serde_json::json;
//! use sieve_validator::Validator;
//!
//! let validator = Validator::new();
//! let mut validation = validator
//!     .make(
//!         json!({ "users": [{ "email": "a@x.io" }, { "email": "nope" }] }),
//!         [("users.*.email", "required|email")],
//!     )
//!     .unwrap();
//!
//! assert!(!validation.validate().unwrap());
//! assert_eq!(validation.errors().count(), 1);
//! assert!(validation.errors().has("users.1.email:email"));
//! ```

mod attribute;
mod bag;
mod message;
mod outcome;
mod pattern;

pub use attribute::{Attribute, humanize};
pub use bag::ErrorBag;
pub use outcome::{Status, ValidationOutcome};
pub use pattern::{Captures, Expansion, PathPattern, WILDCARD};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use sieve_support::arr;
use sieve_support::value::value_type_name;
use tracing::{debug, trace};

use crate::foundation::{PresenceVerifier, RuleContext, RuleSet, ValidatorResult};
use crate::registry::RuleRegistry;
use crate::rules::Required;

use message::{MessageResolver, Subject};

/// One input document and the attributes validated against it.
pub struct Validation {
    inputs: Value,
    attributes: IndexMap<String, Attribute>,
    aliases: IndexMap<String, String>,
    messages: IndexMap<String, String>,
    errors: ErrorBag,
    outcome: ValidationOutcome,
    registry: Arc<RuleRegistry>,
    humanized: bool,
    separator: String,
    presence: Option<Arc<dyn PresenceVerifier>>,
}

impl Validation {
    /// Creates a validation with no attributes. Non-object inputs are
    /// replaced by an empty object.
    ///
    /// A top-level input key written as `key:Alias` is stored under `key`
    /// and sets `Alias` as that attribute's display name.
    #[must_use]
    pub fn new(inputs: Value, registry: Arc<RuleRegistry>) -> Self {
        let mut validation = Self {
            inputs: Value::Object(Map::new()),
            attributes: IndexMap::new(),
            aliases: IndexMap::new(),
            messages: IndexMap::new(),
            errors: ErrorBag::new(),
            outcome: ValidationOutcome::new(),
            registry,
            humanized: true,
            separator: ":".to_owned(),
            presence: None,
        };
        if let Value::Object(inputs) = inputs {
            let inputs = validation.take_input_aliases(inputs);
            validation.inputs = Value::Object(inputs);
        }
        validation
    }

    /// Strips `:Alias` suffixes from top-level input keys into the alias map.
    fn take_input_aliases(&mut self, inputs: Map<String, Value>) -> Map<String, Value> {
        let mut resolved = Map::with_capacity(inputs.len());
        for (key, value) in inputs {
            let mut parts = key.split(':');
            let name = parts.next().unwrap_or_default();
            if let Some(alias) = parts.next() {
                self.set_alias(name, alias);
            }
            resolved.insert(name.to_owned(), value);
        }
        resolved
    }

    /// Resolves `rules` and registers them under `key`, replacing any
    /// earlier registration of the same key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`](crate::ValidatorError) for an unknown rule
    /// name, a malformed rule string or a rule rejecting its parameters.
    pub fn add_attribute(&mut self, key: impl Into<String>, rules: impl Into<RuleSet>) -> ValidatorResult<()> {
        let key = key.into();
        let rules: RuleSet = rules.into();
        let rules = rules
            .into_iter()
            .map(|spec| self.registry.resolve_spec(&key, spec))
            .collect::<ValidatorResult<Vec<_>>>()?;

        let attribute = Attribute::new(&key, rules).with_alias(self.aliases.get(&key).cloned());
        self.attributes.insert(key, attribute);
        Ok(())
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Runs every attribute and returns whether the input passed.
    ///
    /// Errors and outcome of a previous run are discarded first.
    ///
    /// # Errors
    ///
    /// A rule that cannot run (missing parameter, no presence verifier)
    /// aborts the run. Results recorded up to that point are kept.
    pub fn validate(&mut self) -> ValidatorResult<bool> {
        self.errors.clear();
        self.outcome.clear();

        let span = tracing::debug_span!("validate", attributes = self.attributes.len());
        let _enter = span.enter();
        debug!("validation started");

        let mut attributes = std::mem::take(&mut self.attributes);
        for attribute in attributes.values_mut() {
            for rule in attribute.rules_mut() {
                rule.before_validate();
            }
        }

        let result = attributes
            .values_mut()
            .try_for_each(|attribute| self.validate_attribute(attribute));
        self.attributes = attributes;
        result?;

        debug!(
            checked = self.outcome.len(),
            errors = self.errors.count(),
            "validation finished"
        );
        debug_assert!(self.outcome.is_partitioned());
        Ok(self.passes())
    }

    /// Merges `inputs` into the stored input at the top level, then runs
    /// [`validate`](Self::validate). `key:Alias` keys are resolved as in
    /// [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn validate_with(&mut self, inputs: Value) -> ValidatorResult<bool> {
        if let Value::Object(extra) = inputs {
            let extra = self.take_input_aliases(extra);
            if let Value::Object(stored) = &mut self.inputs {
                stored.extend(extra);
            }
        }
        self.validate()
    }

    fn validate_attribute(&mut self, attribute: &mut Attribute) -> ValidatorResult<()> {
        let expansions = attribute.pattern().expand(&self.inputs);
        for expansion in expansions {
            let (key, captures) = expansion.into_parts();
            self.validate_concrete(attribute, &key, &captures)?;
        }
        Ok(())
    }

    fn validate_concrete(&mut self, attribute: &mut Attribute, key: &str, captures: &[String]) -> ValidatorResult<()> {
        let value = arr::get(&self.inputs, key).cloned().unwrap_or(Value::Null);
        let empty = Required::is_empty_value(&value);

        if empty && attribute.is_nullable() {
            self.outcome.record(key, Status::Valid, value);
            return Ok(());
        }

        let primary = attribute.key().to_owned();
        let mut valid = true;

        for index in 0..attribute.rules().len() {
            if empty && attribute.is_optional(attribute.rules()[index].as_ref()) {
                continue;
            }

            let ctx = RuleContext::new(key, &primary, captures, &self.inputs).with_presence(self.presence.as_deref());
            let rule = &mut attribute.rules_mut()[index];
            if rule.check(&value, &ctx)? {
                continue;
            }

            valid = false;
            let rule = attribute.rules()[index].as_ref();
            let resolver = MessageResolver {
                messages: &self.messages,
                aliases: &self.aliases,
                separator: &self.separator,
                humanized: self.humanized,
            };
            let message = resolver.resolve(Subject { attribute, key, captures }, &value, rule);

            trace!(
                attribute = key,
                rule = rule.key(),
                value_type = value_type_name(&value),
                "rule failed"
            );
            self.errors.add(key, rule.key(), message);

            if rule.is_implicit() {
                break;
            }
        }

        let status = if valid { Status::Valid } else { Status::Invalid };
        self.outcome.record(key, status, value);
        Ok(())
    }

    #[must_use]
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn fails(&self) -> bool {
        !self.passes()
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    #[must_use]
    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    /// Nested data of every concrete attribute that passed.
    #[must_use]
    pub fn valid_data(&self) -> Value {
        self.outcome.valid_data()
    }

    /// Nested data of every concrete attribute that failed.
    #[must_use]
    pub fn invalid_data(&self) -> Value {
        self.outcome.invalid_data()
    }

    #[must_use]
    pub fn validated_data(&self) -> Value {
        self.outcome.validated_data()
    }

    #[must_use]
    pub fn inputs(&self) -> &Value {
        &self.inputs
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        arr::get(&self.inputs, key)
    }

    pub fn set_value(&mut self, key: &str, value: Value) {
        arr::set(&mut self.inputs, key, value);
    }

    #[must_use]
    pub fn has_value(&self, key: &str) -> bool {
        arr::has(&self.inputs, key)
    }

    /// Display name for `key` in messages. Applies to an attribute
    /// registered under `key` as well as to a concrete key it expands to.
    pub fn set_alias(&mut self, key: impl Into<String>, alias: impl Into<String>) {
        let key = key.into();
        let alias = alias.into();
        if let Some(attribute) = self.attributes.get_mut(&key) {
            attribute.set_alias(alias.clone());
        }
        self.aliases.insert(key, alias);
    }

    pub fn set_aliases<I, K, A>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = (K, A)>,
        K: Into<String>,
        A: Into<String>,
    {
        for (key, alias) in aliases {
            self.set_alias(key, alias);
        }
    }

    #[must_use]
    pub fn alias(&self, key: &str) -> Option<&str> {
        self.aliases.get(key).map(String::as_str)
    }

    /// Overrides the message template for a lookup key (`email`,
    /// `users.*.email`, `age:min`, ...).
    pub fn set_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    pub fn set_messages<I, K, M>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        for (key, message) in messages {
            self.set_message(key, message);
        }
    }

    #[must_use]
    pub fn messages(&self) -> &IndexMap<String, String> {
        &self.messages
    }

    pub fn set_presence_verifier(&mut self, verifier: Arc<dyn PresenceVerifier>) {
        self.presence = Some(verifier);
    }

    #[must_use]
    pub fn presence_verifier(&self) -> Option<&dyn PresenceVerifier> {
        self.presence.as_deref()
    }

    pub(crate) fn set_humanized(&mut self, humanized: bool) {
        self.humanized = humanized;
    }

    pub(crate) fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    pub(crate) fn set_presence(&mut self, verifier: Option<Arc<dyn PresenceVerifier>>) {
        self.presence = verifier;
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("errors", &self.errors.count())
            .field("humanized", &self.humanized)
            .field("separator", &self.separator)
            .field("presence", &self.presence.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::foundation::ValidatorError;
    use crate::rules::Callback;

    fn validation(inputs: Value) -> Validation {
        Validation::new(inputs, Arc::new(RuleRegistry::with_builtins()))
    }

    #[test]
    fn wildcard_reports_only_the_bad_element() {
        let mut v = validation(json!({
            "users": [{ "email": "a@x.io" }, { "email": "not-an-email" }]
        }));
        v.add_attribute("users.*.email", "required|email").unwrap();

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors().count(), 1);
        assert_eq!(v.errors().keys(), ["users.1.email"]);
        assert_eq!(v.valid_data(), json!({ "users": { "0": { "email": "a@x.io" } } }));
        assert_eq!(v.invalid_data(), json!({ "users": { "1": { "email": "not-an-email" } } }));
    }

    #[test]
    fn nullable_skips_every_rule() {
        let mut v = validation(json!({ "nickname": null }));
        v.add_attribute("nickname", "nullable|min:3|alpha").unwrap();

        assert!(v.validate().unwrap());
        assert_eq!(v.valid_data(), json!({ "nickname": null }));
    }

    #[test]
    fn implicit_failure_stops_the_chain() {
        let mut v = validation(json!({}));
        v.add_attribute("email", "required|email|min:5").unwrap();

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors().count(), 1);
        assert!(v.errors().has("email:required"));
    }

    #[test]
    fn optional_rules_skip_empty_values() {
        let mut v = validation(json!({ "website": "" }));
        v.add_attribute("website", "url|max:10").unwrap();

        assert!(v.validate().unwrap());
    }

    #[test]
    fn non_implicit_failures_accumulate() {
        let mut v = validation(json!({ "code": "ab1" }));
        v.add_attribute("code", "alpha|min:5").unwrap();

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors().get("code")["code"].len(), 2);
    }

    #[test]
    fn rerun_resets_results() {
        let mut v = validation(json!({ "name": "" }));
        v.add_attribute("name", "required").unwrap();
        assert!(!v.validate().unwrap());

        v.set_value("name", json!("Ann"));
        assert!(v.validate().unwrap());
        assert!(v.errors().is_empty());
        assert_eq!(v.invalid_data(), json!({}));
    }

    #[test]
    fn input_keys_carry_aliases() {
        let mut v = validation(json!({ "email:E-mail": "nope", "name": "Ann" }));
        v.add_attribute("email", "email").unwrap();

        assert_eq!(v.value("email"), Some(&json!("nope")));
        assert!(!v.has_value("email:E-mail"));
        assert_eq!(v.alias("email"), Some("E-mail"));
        assert!(!v.validate().unwrap());
        assert_eq!(v.errors().first("email"), Some("The E-mail is not valid email"));

        v.add_attribute("phone", "required").unwrap();
        v.validate_with(json!({ "phone:Mobile number": "" })).unwrap();
        assert_eq!(v.errors().first("phone"), Some("The Mobile number is required"));
    }

    #[test]
    fn validate_with_merges_top_level_inputs() {
        let mut v = validation(json!({ "a": 1 }));
        v.add_attribute("b", "required").unwrap();

        assert!(v.validate_with(json!({ "b": 2 })).unwrap());
        assert_eq!(v.value("a"), Some(&json!(1)));
        assert_eq!(v.validated_data(), json!({ "b": 2 }));
    }

    #[test]
    fn unknown_rule_is_rejected_when_added() {
        let mut v = validation(json!({}));
        let err = v.add_attribute("a", "required|bogus").unwrap_err();
        assert_eq!(err, ValidatorError::UnknownRule { rule: "bogus".into() });
        assert!(v.attribute("a").is_none());
    }

    #[test]
    fn missing_verifier_aborts() {
        let mut v = validation(json!({ "email": "a@x.io" }));
        v.add_attribute("email", "unique:users").unwrap();

        let err = v.validate().unwrap_err();
        assert_eq!(err.code(), "RULE_NO_PRESENCE_VERIFIER");
    }

    #[test]
    fn aliases_reach_registered_attributes() {
        let mut v = validation(json!({}));
        v.add_attribute("email", "required").unwrap();
        v.set_alias("email", "E-mail address");

        v.validate().unwrap();
        assert_eq!(v.alias("email"), Some("E-mail address"));
        assert_eq!(v.errors().first("email"), Some("The E-mail address is required"));
    }

    #[test]
    fn rule_sees_captures_and_siblings() {
        let mut v = validation(json!({
            "items": [{ "qty": 2, "max": 5 }, { "qty": 9, "max": 5 }]
        }));
        let set = RuleSet::new().callback(|value, ctx| {
            let max = ctx.value("items.*.max").and_then(Value::as_i64).unwrap_or(0);
            value.as_i64().is_some_and(|qty| qty <= max)
        });
        v.add_attribute("items.*.qty", set).unwrap();
        v.set_message("items.*.qty", "Row {0} exceeds its maximum");

        assert!(!v.validate().unwrap());
        assert_eq!(v.errors().all(), ["Row 2 exceeds its maximum"]);
    }

    #[test]
    fn callback_message_fn() {
        let mut v = validation(json!({ "n": 3 }));
        let rule = Callback::new(|value, _| value.as_i64() == Some(4))
            .with_message_fn(|value, ctx| format!("{} should be 4, got {value}", ctx.attribute()));
        v.add_attribute("n", RuleSet::new().rule(rule)).unwrap();

        v.validate().unwrap();
        assert_eq!(v.errors().first("n:callback"), Some("n should be 4, got 3"));
    }

    #[test]
    fn wildcard_over_missing_container_yields_nothing() {
        let mut v = validation(json!({ "users": "none" }));
        v.add_attribute("users.*.email", "required").unwrap();

        assert!(v.validate().unwrap());
        assert!(v.outcome().is_empty());
    }

    #[test]
    fn non_object_inputs_become_empty() {
        let v = validation(json!([1, 2]));
        assert_eq!(v.inputs(), &json!({}));
    }
}

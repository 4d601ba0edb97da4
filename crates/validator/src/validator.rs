//! Entry point that builds validations

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::engine::Validation;
use crate::foundation::{PresenceVerifier, Rule, RuleSet, ValidatorResult};
use crate::registry::RuleRegistry;

/// Builds [`Validation`]s that share one rule registry, one set of
/// message templates and one presence verifier.
///
/// A `Validator` is cheap to clone and can be shared across threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_validator::Validator;
///
/// let mut validator = Validator::new();
/// validator.set_message("required", "Please fill in :attribute");
///
/// let validation = validator
///     .validate(
///         json!({ "name": "", "age": 17 }),
///         [("name", "required"), ("age", "required|integer|min:18")],
///     )
///     .unwrap();
///
/// assert!(validation.fails());
/// assert_eq!(validation.errors().first("name"), Some("Please fill in Name"));
/// assert_eq!(validation.errors().first("age:min"), Some("The Age minimum is 18"));
/// ```
#[derive(Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    config: ValidatorConfig,
    presence: Option<Arc<dyn PresenceVerifier>>,
}

impl Validator {
    /// A validator with every built-in rule and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            registry: Arc::new(RuleRegistry::with_builtins()),
            config,
            presence: None,
        }
    }

    /// Uses an existing registry, e.g. one shared with other validators.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_presence_verifier(mut self, verifier: Arc<dyn PresenceVerifier>) -> Self {
        self.presence = Some(verifier);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Makes a rule available by name to every validation built from here.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> ValidatorResult<Box<dyn Rule>> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
    }

    pub fn set_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.config.messages.insert(key.into(), message.into());
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
        &self.config.messages
    }

    pub fn set_presence_verifier(&mut self, verifier: Arc<dyn PresenceVerifier>) {
        self.presence = Some(verifier);
    }

    /// Toggles humanized attribute names in messages.
    pub fn use_humanized_keys(&mut self, humanized: bool) {
        self.config.humanized_keys = humanized;
    }

    /// Builds a validation without running it.
    ///
    /// # Errors
    ///
    /// Returns the first rule specification that cannot be resolved.
    pub fn make<I, K, R>(&self, inputs: Value, rules: I) -> ValidatorResult<Validation>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<RuleSet>,
    {
        self.make_with_messages(inputs, rules, std::iter::empty::<(String, String)>())
    }

    /// Like [`make`](Self::make), with message templates that take
    /// precedence over the validator's own.
    ///
    /// # Errors
    ///
    /// Returns the first rule specification that cannot be resolved.
    pub fn make_with_messages<I, K, R, M, MK, MV>(&self, inputs: Value, rules: I, messages: M) -> ValidatorResult<Validation>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<RuleSet>,
        M: IntoIterator<Item = (MK, MV)>,
        MK: Into<String>,
        MV: Into<String>,
    {
        let mut validation = Validation::new(inputs, Arc::clone(&self.registry));
        validation.set_humanized(self.config.humanized_keys);
        validation.set_separator(self.config.message_separator.as_str());
        validation.set_messages(&self.config.messages);
        validation.set_messages(messages);
        validation.set_presence(self.presence.clone());

        for (key, rules) in rules {
            validation.add_attribute(key, rules)?;
        }
        Ok(validation)
    }

    /// Builds a validation and runs it.
    ///
    /// # Errors
    ///
    /// Returns an unresolvable rule specification or a rule that cannot run.
    pub fn validate<I, K, R>(&self, inputs: Value, rules: I) -> ValidatorResult<Validation>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<RuleSet>,
    {
        let mut validation = self.make(inputs, rules)?;
        validation.validate()?;
        Ok(validation)
    }

    /// Like [`validate`](Self::validate), with extra message templates.
    ///
    /// # Errors
    ///
    /// Returns an unresolvable rule specification or a rule that cannot run.
    pub fn validate_with_messages<I, K, R, M, MK, MV>(
        &self,
        inputs: Value,
        rules: I,
        messages: M,
    ) -> ValidatorResult<Validation>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<RuleSet>,
        M: IntoIterator<Item = (MK, MV)>,
        MK: Into<String>,
        MV: Into<String>,
    {
        let mut validation = self.make_with_messages(inputs, rules, messages)?;
        validation.validate()?;
        Ok(validation)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("presence", &self.presence.is_some())
            .finish()
    }
}

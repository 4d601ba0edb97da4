//! Rule registry for resolving rule names to rule instances.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::foundation::{Rule, RuleSpec, ValidatorError, ValidatorResult, parse_rule};

/// Builds a rule from its string arguments.
pub type RuleFactory = Arc<dyn Fn(&[String]) -> ValidatorResult<Box<dyn Rule>> + Send + Sync>;

/// Thread-safe registry of rule factories.
///
/// Rules are registered by name (e.g. `"required"`) and instantiated
/// when an attribute is added, so every attribute owns fresh rule state.
/// Uses `DashMap` for lock-free concurrent access.
///
/// # Examples
///
/// ```
/// use sieve_validator::RuleRegistry;
///
/// let registry = RuleRegistry::with_builtins();
/// let rule = registry.resolve("between", &["1".into(), "5".into()]).unwrap();
/// assert_eq!(rule.key(), "between");
/// assert!(registry.resolve("nope", &[]).is_err());
/// ```
pub struct RuleRegistry {
    factories: DashMap<String, RuleFactory>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Create a registry holding every built-in rule.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::rules::register_builtins(&registry);
        registry
    }

    /// Register a rule factory.
    ///
    /// If a factory with the same name already exists, it is replaced.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> ValidatorResult<Box<dyn Rule>> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::info!(rule = %name, "registered validation rule");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Register without logging; used for the built-in set.
    pub(crate) fn insert(&self, name: &str, factory: RuleFactory) {
        self.factories.insert(name.to_owned(), factory);
    }

    /// Instantiate the rule registered under `name`.
    pub fn resolve(&self, name: &str, args: &[String]) -> ValidatorResult<Box<dyn Rule>> {
        let factory = self
            .factories
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ValidatorError::UnknownRule {
                rule: name.to_owned(),
            })?;
        factory(args)
    }

    /// Turn one entry of an attribute's rule list into a rule instance.
    pub fn resolve_spec(&self, attribute: &str, spec: RuleSpec) -> ValidatorResult<Box<dyn Rule>> {
        match spec {
            RuleSpec::Rule(rule) => Ok(rule),
            RuleSpec::Named(text) => {
                let (name, args) = parse_rule(attribute, &text)?;
                self.resolve(name, &args)
            }
        }
    }

    /// Check if a factory is registered under the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Remove a factory by name. Returns whether one was registered.
    pub fn remove(&self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// List all registered rule names.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.factories.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.len())
            .finish()
    }
}

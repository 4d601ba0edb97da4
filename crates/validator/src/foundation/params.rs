//! Named rule parameters
//!
//! String rules carry positional arguments (`between:3,10`). Each rule
//! declares the names of its leading positions; [`Parameters::bind`] pairs
//! them up and keeps any surplus as a list for variadic rules such as
//! `in:a,b,c`.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::foundation::ValidatorError;

/// Parameters of one rule instance.
///
/// Stored as ordered key-value pairs (typically 0-3 params) plus the
/// unnamed remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    named: SmallVec<[(Cow<'static, str>, String); 2]>,
    rest: Vec<String>,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `names` with the leading `args`; the surplus goes to
    /// [`rest`](Self::rest). Missing trailing arguments stay unbound.
    ///
    /// # Examples
    ///
    /// ```
    /// use sieve_validator::foundation::Parameters;
    ///
    /// let args = ["status".to_string(), "active".to_string(), "trial".to_string()];
    /// let params = Parameters::bind(&["field"], &args);
    /// assert_eq!(params.get("field"), Some("status"));
    /// assert_eq!(params.rest(), ["active", "trial"]);
    /// ```
    #[must_use]
    pub fn bind(names: &[&'static str], args: &[String]) -> Self {
        let named = names
            .iter()
            .zip(args)
            .map(|(name, arg)| (Cow::Borrowed(*name), arg.clone()))
            .collect();
        let rest = args.iter().skip(names.len()).cloned().collect();
        Self { named, rest }
    }

    /// Sets `name` only when it is not bound yet.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if self.get(name).is_none() {
            self.named.push((Cow::Borrowed(name), value.into()));
        }
        self
    }

    /// Binds or rebinds `name`.
    pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.named.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.named.push((name, value)),
        }
    }

    /// Looks up a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Arguments past the named positions.
    #[must_use]
    pub fn rest(&self) -> &[String] {
        &self.rest
    }

    /// Fails with [`ValidatorError::MissingParameter`] for the first name
    /// that is not bound.
    pub fn require(&self, rule: &str, names: &[&str]) -> Result<(), ValidatorError> {
        match names.iter().find(|name| self.get(name).is_none()) {
            Some(missing) => Err(ValidatorError::missing_parameter(rule, *missing)),
            None => Ok(()),
        }
    }

    /// Looks up a parameter that must be bound.
    pub fn value(&self, rule: &str, name: &str) -> Result<&str, ValidatorError> {
        self.get(name)
            .ok_or_else(|| ValidatorError::missing_parameter(rule, name))
    }

    /// Looks up a parameter that must be a number.
    pub fn number(&self, rule: &str, name: &str) -> Result<f64, ValidatorError> {
        let raw = self.value(rule, name)?;
        sieve_support::value::parse_numeric(raw).ok_or_else(|| {
            ValidatorError::invalid_parameter(rule, name, format!("`{raw}` is not a number"))
        })
    }

    /// Named parameters in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Returns true when nothing is bound and there is no remainder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.rest.is_empty()
    }
}

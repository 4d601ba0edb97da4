//! Validator configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::foundation::{ValidatorError, ValidatorResult};

/// Settings shared by every validation a [`Validator`](crate::Validator)
/// makes.
///
/// # Examples
///
/// ```
/// use sieve_validator::ValidatorConfig;
///
/// let config = ValidatorConfig::from_json(
///     r#"{ "humanized_keys": false, "messages": { "required": ":attribute is missing" } }"#,
/// )
/// .unwrap();
///
/// assert!(!config.humanized_keys);
/// assert_eq!(config.message_separator, ":");
/// assert_eq!(config.messages["required"], ":attribute is missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Render `first_name` as `First name` when no alias is set.
    pub humanized_keys: bool,
    /// Separator between attribute and rule in message keys (`age:min`).
    pub message_separator: String,
    /// Message templates by lookup key, overriding the rules' own.
    pub messages: IndexMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            humanized_keys: true,
            message_separator: ":".to_string(),
            messages: IndexMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `SIEVE_HUMANIZED_KEYS` (`true`/`false`/`1`/`0`) and
    /// `SIEVE_MESSAGE_SEPARATOR`. Unset or unparsable values keep the
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(humanized) = std::env::var("SIEVE_HUMANIZED_KEYS") {
            match humanized.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.humanized_keys = true,
                "0" | "false" | "no" | "off" => config.humanized_keys = false,
                other => tracing::warn!(value = other, "ignoring SIEVE_HUMANIZED_KEYS"),
            }
        }

        if let Ok(separator) = std::env::var("SIEVE_MESSAGE_SEPARATOR")
            && !separator.is_empty()
        {
            config.message_separator = separator;
        }

        config
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] for malformed JSON or an empty
    /// separator.
    pub fn from_json(json: &str) -> ValidatorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ValidatorError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] when the separator is empty.
    pub fn validate(&self) -> ValidatorResult<()> {
        if self.message_separator.is_empty() {
            return Err(ValidatorError::Config {
                reason: "message_separator must not be empty".to_string(),
            });
        }
        Ok(())
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_humanized_keys(mut self, humanized: bool) -> Self {
        self.humanized_keys = humanized;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.message_separator = separator.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_messages<I, K, M>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, m)| (k.into(), m.into())));
        self
    }
}

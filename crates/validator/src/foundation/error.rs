//! Error types for misconfigured validation
//!
//! A failed rule is never an error: it lands in the
//! [`ErrorBag`](crate::engine::ErrorBag). [`ValidatorError`] covers the
//! other two cases, both programming mistakes:
//!
//! - a rule specification that cannot be resolved (unknown rule name,
//!   malformed string form, unparsable parameter), raised when the
//!   attribute is added;
//! - a rule that runs without the parameters it needs, raised from
//!   [`Validation::validate`](crate::engine::Validation::validate).

/// Error type for rule resolution and rule execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidatorError {
    /// No factory is registered under the rule name.
    #[error("unknown validation rule `{rule}`")]
    UnknownRule { rule: String },

    /// The rule specification for an attribute cannot be parsed.
    #[error("invalid rule specification for `{attribute}`: {reason}")]
    InvalidRuleSpec { attribute: String, reason: String },

    /// A rule ran without a parameter it requires.
    #[error("rule `{rule}` requires parameter `{parameter}`")]
    MissingParameter { rule: String, parameter: String },

    /// A rule parameter is present but unusable.
    #[error("rule `{rule}` has an invalid `{parameter}` parameter: {reason}")]
    InvalidParameter {
        rule: String,
        parameter: String,
        reason: String,
    },

    /// A storage-backed rule ran but no presence verifier is configured.
    #[error("rule `{rule}` needs a presence verifier, none is configured")]
    MissingPresenceVerifier { rule: String },

    /// Validator configuration could not be loaded.
    #[error("invalid validator configuration: {reason}")]
    Config { reason: String },
}

impl ValidatorError {
    /// Creates a [`ValidatorError::MissingParameter`].
    pub fn missing_parameter(rule: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            rule: rule.into(),
            parameter: parameter.into(),
        }
    }

    /// Creates a [`ValidatorError::InvalidParameter`].
    pub fn invalid_parameter(
        rule: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::UnknownRule { .. } | Self::InvalidRuleSpec { .. } => "specification",
            Self::MissingParameter { .. } | Self::InvalidParameter { .. } => "parameter",
            Self::MissingPresenceVerifier { .. } => "storage",
            Self::Config { .. } => "config",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UnknownRule { .. } => "RULE_UNKNOWN",
            Self::InvalidRuleSpec { .. } => "RULE_INVALID_SPEC",
            Self::MissingParameter { .. } => "RULE_MISSING_PARAMETER",
            Self::InvalidParameter { .. } => "RULE_INVALID_PARAMETER",
            Self::MissingPresenceVerifier { .. } => "RULE_NO_PRESENCE_VERIFIER",
            Self::Config { .. } => "VALIDATOR_CONFIG",
        }
    }
}

/// Result alias for fallible validator operations.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

//! Closure-backed rule

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::{Parameters, Rule, RuleContext, ValidatorError};

type CheckFn = dyn Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync;
type MessageFn = dyn Fn(&Value, &RuleContext<'_>) -> String + Send + Sync;

/// Wraps a closure as a rule.
///
/// The message can be a fixed template or built from the failing value.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_validator::rules::Callback;
/// use sieve_validator::Validator;
///
/// let validator = Validator::new();
/// let rules = [(
///     "code",
///     sieve_validator::RuleSet::new()
///         .rule(Callback::new(|value, _| value.as_str().is_some_and(|s| s.starts_with("EU")))
///             .with_message("The :attribute must be an EU code")),
/// )];
///
/// let validation = validator.validate(json!({ "code": "US-1" }), rules).unwrap();
/// assert_eq!(validation.errors().first("code"), Some("The Code must be an EU code"));
/// ```
#[derive(Clone)]
pub struct Callback {
    params: Parameters,
    message: Cow<'static, str>,
    check: Arc<CheckFn>,
    message_fn: Option<Arc<MessageFn>>,
    rendered: Option<String>,
}

impl Callback {
    pub const KEY: &'static str = "callback";
    pub const MESSAGE: &'static str = "The :attribute is not valid";

    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            params: Parameters::new(),
            message: Cow::Borrowed(Self::MESSAGE),
            check: Arc::new(check),
            message_fn: None,
            rendered: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Builds the message template from the value that failed.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_fn<F>(mut self, message: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> String + Send + Sync + 'static,
    {
        self.message_fn = Some(Arc::new(message));
        self
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("message", &self.message)
            .field("message_fn", &self.message_fn.is_some())
            .finish_non_exhaustive()
    }
}

impl Rule for Callback {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn message(&self) -> &str {
        self.rendered.as_deref().unwrap_or(&self.message)
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn before_validate(&mut self) {
        self.rendered = None;
    }

    fn check(&mut self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
        let passed = (self.check)(value, ctx);
        self.rendered = match (&self.message_fn, passed) {
            (Some(build), false) => Some(build(value, ctx)),
            _ => None,
        };
        Ok(passed)
    }
}

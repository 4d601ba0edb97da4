//! Built-in rules
//!
//! - **Presence**: [`Required`], [`RequiredIf`], [`RequiredWith`],
//!   [`Present`], [`Accepted`], [`Nullable`]
//! - **Format**: [`Email`], [`Url`], [`Ip`], [`MatchesRegex`], [`Alpha`],
//!   [`AlphaNum`], [`AlphaDash`], [`Lowercase`], [`Uppercase`], [`Json`]
//! - **Numeric and size**: [`Numeric`], [`Integer`], [`Digits`], [`Min`],
//!   [`Max`], [`Between`]
//! - **Type**: [`Boolean`], [`Array`]
//! - **Comparison**: [`In`], [`NotIn`], [`Same`], [`Different`], [`Distinct`]
//! - **Date**: [`Date`]
//! - **Storage**: [`Unique`], [`Exists`]
//! - **Closure**: [`Callback`]
//!
//! All but [`Callback`] are registered by name in
//! [`RuleRegistry::with_builtins`](crate::RuleRegistry::with_builtins).

use std::sync::Arc;

use serde_json::Value;
use sieve_support::value::{as_number, number_as_f64, parse_numeric};

use crate::foundation::{Rule, ValidatorResult};
use crate::registry::{RuleFactory, RuleRegistry};

mod callback;
mod comparison;
mod date;
mod format;
mod numeric;
mod required;
mod storage;
mod types;

pub use callback::Callback;
pub use comparison::{Different, Distinct, In, NotIn, Same, different, distinct, same};
pub use date::{DEFAULT_FORMAT as DEFAULT_DATE_FORMAT, Date, date};
pub use format::{
    Alpha, AlphaDash, AlphaNum, Email, Ip, Json, Lowercase, MatchesRegex, Uppercase, Url, alpha,
    alpha_dash, alpha_num, email, ip, json, lowercase, matches_regex, uppercase, url,
};
pub use numeric::{Between, Digits, Integer, Max, Min, Numeric, between, digits, integer, max, min, numeric};
pub use required::{
    Accepted, Nullable, Present, Required, RequiredIf, RequiredWith, accepted, nullable, present,
    required, required_if, required_with,
};
pub use storage::{Exists, Unique, exists, unique};
pub use types::{Array, Boolean, array, boolean};

/// Registers every named built-in rule.
pub(crate) fn register_builtins(registry: &RuleRegistry) {
    fn infallible<R: Rule + 'static>(build: fn(&[String]) -> R) -> RuleFactory {
        Arc::new(move |args: &[String]| -> ValidatorResult<Box<dyn Rule>> {
            Ok(Box::new(build(args)))
        })
    }

    registry.insert(Required::KEY, infallible(Required::from_args));
    registry.insert(RequiredIf::KEY, infallible(RequiredIf::from_args));
    registry.insert(RequiredWith::KEY, infallible(RequiredWith::from_args));
    registry.insert(Present::KEY, infallible(Present::from_args));
    registry.insert(Accepted::KEY, infallible(Accepted::from_args));
    registry.insert(Nullable::KEY, infallible(Nullable::from_args));

    registry.insert(Email::KEY, infallible(Email::from_args));
    registry.insert(Url::KEY, infallible(Url::from_args));
    registry.insert(Ip::KEY, infallible(Ip::from_args));
    registry.insert(Alpha::KEY, infallible(Alpha::from_args));
    registry.insert(AlphaNum::KEY, infallible(AlphaNum::from_args));
    registry.insert(AlphaDash::KEY, infallible(AlphaDash::from_args));
    registry.insert(Lowercase::KEY, infallible(Lowercase::from_args));
    registry.insert(Uppercase::KEY, infallible(Uppercase::from_args));
    registry.insert(Json::KEY, infallible(Json::from_args));
    registry.insert(
        MatchesRegex::KEY,
        Arc::new(|args: &[String]| -> ValidatorResult<Box<dyn Rule>> {
            Ok(Box::new(MatchesRegex::from_args(args)?))
        }),
    );

    registry.insert(Numeric::KEY, infallible(Numeric::from_args));
    registry.insert(Integer::KEY, infallible(Integer::from_args));
    registry.insert(Digits::KEY, infallible(Digits::from_args));
    registry.insert(Min::KEY, infallible(Min::from_args));
    registry.insert(Max::KEY, infallible(Max::from_args));
    registry.insert(Between::KEY, infallible(Between::from_args));

    registry.insert(Boolean::KEY, infallible(Boolean::from_args));
    registry.insert(Array::KEY, infallible(Array::from_args));

    registry.insert(In::KEY, infallible(In::from_args));
    registry.insert(NotIn::KEY, infallible(NotIn::from_args));
    registry.insert(Same::KEY, infallible(Same::from_args));
    registry.insert(Different::KEY, infallible(Different::from_args));
    registry.insert(Distinct::KEY, infallible(|_| Distinct::new()));
    registry.insert(Date::KEY, infallible(Date::from_args));

    registry.insert(Unique::KEY, infallible(Unique::from_args));
    registry.insert(Exists::KEY, infallible(Exists::from_args));
}

/// Compares an input value with a rule argument the way form input is
/// compared: numbers numerically, booleans as `1`/`0`/`true`/`false`.
pub(crate) fn loose_eq(value: &Value, text: &str) -> bool {
    match value {
        Value::String(s) => s == text,
        Value::Number(n) => match (number_as_f64(n), parse_numeric(text)) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => false,
        },
        Value::Bool(true) => matches!(text, "1" | "true"),
        Value::Bool(false) => matches!(text, "0" | "false" | ""),
        Value::Null => matches!(text, "" | "null"),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Size used by `min`, `max` and `between`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) => as_number(value),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        Value::Bool(_) | Value::Null => None,
    }
}

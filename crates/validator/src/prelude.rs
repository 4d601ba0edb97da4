//! Prelude module for convenient imports.
//!
//! Provides a single `use sieve_validator::prelude::*;` import that brings
//! in the validator, the rule traits and the built-in rule constructors.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use sieve_validator::prelude::*;
//!
//! let rules = RuleSet::new().rule(required()).rule(between(1, 10));
//! let validation = Validator::new().validate(json!({ "n": 4 }), [("n", rules)]).unwrap();
//! assert!(validation.passes());
//! ```

// ============================================================================
// FOUNDATION: Rule traits, specifications, errors
// ============================================================================

pub use crate::foundation::{
    Parameters, PresenceVerifier, Rule, RuleContext, RuleSet, RuleSpec, ValidatorError,
    ValidatorResult,
};

// ============================================================================
// ENGINE: Validation runs and their results
// ============================================================================

pub use crate::config::ValidatorConfig;
pub use crate::engine::{ErrorBag, Status, Validation, ValidationOutcome};
pub use crate::registry::RuleRegistry;
pub use crate::validator::Validator;

// ============================================================================
// RULES: Built-in rule constructors
// ============================================================================

pub use crate::rules::{
    Callback, accepted, alpha, alpha_dash, alpha_num, array, between, boolean, date, different,
    digits, distinct, email, exists, integer, ip, json, lowercase, matches_regex, max, min,
    nullable, numeric, present, required, required_if, required_with, same, unique, uppercase,
    url,
};

//! # sieve-validator
//!
//! Rule-driven validation of nested JSON input addressed by dotted paths.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sieve_validator::prelude::*;
//!
//! let validator = Validator::new();
//! let validation = validator
//!     .validate(
//!         json!({
//!             "name": "Ann",
//!             "users": [{ "email": "a@x.io" }, { "email": "not-an-email" }],
//!         }),
//!         [("name", "required|alpha"), ("users.*.email", "required|email")],
//!     )
//!     .unwrap();
//!
//! assert!(validation.fails());
//! assert_eq!(
//!     validation.errors().first("users.*.email"),
//!     Some("The Users 2 email is not valid email"),
//! );
//! assert_eq!(validation.valid_data()["name"], "Ann");
//! ```
//!
//! ## Rules
//!
//! Rules are given as piped strings (`"required|between:1,10"`), as rule
//! values ([`RuleSet::rule`]) or as closures ([`RuleSet::callback`]).
//! Named rules are resolved through a [`RuleRegistry`]; see [`rules`] for
//! the built-in set and [`Rule`](foundation::Rule) for writing your own.
//!
//! ## Messages
//!
//! Every failure is rendered into the [`ErrorBag`]. Templates are looked up
//! by `attribute:rule`, then the wildcard attribute, then the rule name,
//! before falling back to the rule's default (see
//! [`Validation::set_message`]).

pub mod config;
pub mod engine;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod validator;

pub use config::ValidatorConfig;
pub use engine::{ErrorBag, Validation, ValidationOutcome};
pub use foundation::{RuleSet, RuleSpec, ValidatorError, ValidatorResult};
pub use registry::{RuleFactory, RuleRegistry};
pub use validator::Validator;

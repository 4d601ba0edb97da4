//! Core types shared by rules and the engine
//!
//! - **Rules**: [`Rule`], [`RuleContext`], [`PresenceVerifier`]
//! - **Parameters**: [`Parameters`]
//! - **Specifications**: [`RuleSpec`], [`RuleSet`], [`parse_rule`]
//! - **Errors**: [`ValidatorError`], [`ValidatorResult`]
//!
//! A rule never returns an error for bad input. `Ok(false)` means the
//! value failed and the engine records a message; `Err` means the rule
//! itself is unusable (for example a `min` rule without its parameter).

pub mod error;
pub mod params;
pub mod rule;
pub mod spec;

pub use error::{ValidatorError, ValidatorResult};
pub use params::Parameters;
pub use rule::{PresenceVerifier, Rule, RuleContext};
pub use spec::{RuleSet, RuleSpec, parse_rule};

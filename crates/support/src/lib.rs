//! # sieve-support
//!
//! Helpers for addressing nested `serde_json::Value` trees with
//! dot-delimited paths (`"user.address.zipcode"`).
//!
//! ## Quick Start
//!
//! ```
//! use serde_json::json;
//! use sieve_support::arr;
//!
//! let mut data = json!({ "user": { "name": "Alice" } });
//!
//! arr::set(&mut data, "user.address.city", json!("Lisbon"));
//! assert_eq!(arr::get(&data, "user.address.city"), Some(&json!("Lisbon")));
//! assert!(arr::has(&data, "user.name"));
//!
//! arr::erase(&mut data, "user.name");
//! assert!(!arr::has(&data, "user.name"));
//! ```
//!
//! A key that literally contains a dot always wins over the nested
//! interpretation of the same path:
//!
//! ```
//! use serde_json::json;
//! use sieve_support::arr;
//!
//! let data = json!({ "a.b": 1, "a": { "b": 2 } });
//! assert_eq!(arr::get(&data, "a.b"), Some(&json!(1)));
//! ```

pub mod arr;
pub mod value;

pub use arr::PathList;

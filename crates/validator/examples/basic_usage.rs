//! Basic usage example for sieve-validator
//!
//! Run with `RUST_LOG=sieve_validator=trace` to see the engine's events.

use serde_json::json;
use sieve_validator::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ValidatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = json!({
        "name": "Ann",
        "age": 17,
        "users": [
            { "email": "ann@example.com" },
            { "email": "not-an-email" },
            { "name": "no email" }
        ]
    });

    let mut validator = Validator::new();
    validator.set_message("users.*.email:required", "User {0} needs an email");

    let mut validation = validator.make(
        input,
        [
            ("name", RuleSet::from("required|alpha")),
            ("age", RuleSet::from("required|numeric|min:18")),
            ("users.*.email", RuleSet::from("required|email")),
        ],
    )?;
    validation.set_alias("age", "Your age");

    if validation.validate()? {
        println!("✓ input is valid");
    } else {
        for message in validation.errors().all() {
            println!("✗ {message}");
        }
    }

    println!("\nvalid:   {}", validation.valid_data());
    println!("invalid: {}", validation.invalid_data());
    Ok(())
}

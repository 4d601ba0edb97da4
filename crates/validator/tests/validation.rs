//! Integration tests for full validation runs.

use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use sieve_validator::prelude::*;

fn run(input: Value, rules: &[(&str, &str)]) -> Validation {
    Validator::new()
        .validate(input, rules.iter().copied())
        .expect("rules resolve")
}

// ============================================================================
// WILDCARDS
// ============================================================================

#[test]
fn wildcard_email_reports_single_error() {
    let validation = run(
        json!({ "users": [{ "email": "a@x.io" }, { "email": "not-an-email" }] }),
        &[("users.*.email", "required|email")],
    );

    assert!(validation.fails());
    assert_eq!(validation.errors().count(), 1);
    assert_eq!(
        validation.errors().first("users.1.email:email"),
        Some("The Users 2 email is not valid email")
    );
    assert_eq!(validation.valid_data(), json!({ "users": { "0": { "email": "a@x.io" } } }));
    assert_eq!(
        validation.invalid_data(),
        json!({ "users": { "1": { "email": "not-an-email" } } })
    );
}

#[test]
fn missing_field_inside_wildcard_element_is_required() {
    let validation = run(
        json!({ "users": [{ "email": "a@x.io" }, { "name": "Bob" }] }),
        &[("users.*.email", "required|email")],
    );

    assert_eq!(validation.errors().keys(), ["users.1.email"]);
    assert!(validation.errors().has("users.1.email:required"));
    assert!(!validation.errors().has("users.1.email:email"));
}

#[test]
fn nested_wildcards_expand_every_level() {
    let validation = run(
        json!({
            "groups": {
                "admins": { "members": ["ann", "BOB"] },
                "guests": { "members": ["cy"] }
            }
        }),
        &[("groups.*.members.*", "lowercase")],
    );

    assert_eq!(validation.errors().keys(), ["groups.admins.members.1"]);
    assert_eq!(validation.outcome().len(), 3);
}

#[rstest]
#[case::largest_i64("9223372036854775807", "The Users 9223372036854775808 email is not valid email")]
#[case::largest_u64("18446744073709551615", "The Users 18446744073709551615 email is not valid email")]
fn huge_wildcard_indices_render_without_overflow(#[case] index: &str, #[case] expected: &str) {
    let mut validator = Validator::new();
    validator.set_message("users.*.email:email", ":attribute is bad at {0}");

    let validation = validator
        .validate(json!({ "users": { index: { "email": "bad" } } }), [("users.*.email", "email")])
        .expect("rules resolve");

    assert_eq!(validation.errors().count(), 1);
    let key = format!("users.{index}.email");
    let message = validation.errors().first(&key).expect("one error");
    assert!(message.ends_with(&format!("at {index}")), "{message}");

    let plain = run(json!({ "users": { index: { "email": "bad" } } }), &[("users.*.email", "email")]);
    assert_eq!(plain.errors().first(&key), Some(expected));
}

#[test]
fn literal_dotted_keys_are_not_expanded_into() {
    let validation = run(
        json!({ "items": { "a.b": "skip", "c": "" } }),
        &[("items.*", "required")],
    );

    assert_eq!(validation.errors().keys(), ["items.c"]);
    assert_eq!(validation.outcome().len(), 1);
}

#[test]
fn capture_placeholders_in_custom_messages() {
    let validation = Validator::new()
        .validate_with_messages(
            json!({ "rows": [{ "qty": 1 }, { "qty": 0 }] }),
            [("rows.*.qty", "min:1")],
            [("rows.*.qty:min", "Row {0} (index [0]) needs at least :min")],
        )
        .unwrap();

    assert_eq!(validation.errors().all(), ["Row 2 (index 1) needs at least 1"]);
}

#[test]
fn distinct_compares_wildcard_siblings() {
    let mut validation = Validator::new()
        .make(
            json!({ "tags": ["red", "blue", "red"] }),
            [("tags.*", "distinct")],
        )
        .unwrap();

    assert!(!validation.validate().unwrap());
    assert_eq!(validation.errors().keys(), ["tags.0", "tags.2"]);

    validation.set_value("tags", json!(["red", "blue"]));
    assert!(validation.validate().unwrap());
}

// ============================================================================
// RULE CHAIN
// ============================================================================

#[test]
fn nullable_with_empty_value_skips_rules() {
    let validation = run(json!({ "bio": "" }), &[("bio", "nullable|min:10|alpha")]);

    assert!(validation.passes());
    assert_eq!(validation.valid_data(), json!({ "bio": "" }));
}

#[test]
fn implicit_failure_short_circuits() {
    let validation = run(json!({ "email": "" }), &[("email", "required|email|max:3")]);

    assert_eq!(validation.errors().count(), 1);
    assert!(validation.errors().has("email:required"));
}

#[rstest]
#[case::absent(json!({}), true)]
#[case::empty_string(json!({ "site": "" }), true)]
#[case::valid(json!({ "site": "https://example.com" }), true)]
#[case::invalid(json!({ "site": "example" }), false)]
fn optional_rules_only_run_on_filled_values(#[case] input: Value, #[case] passes: bool) {
    let validation = run(input, &[("site", "url")]);
    assert_eq!(validation.passes(), passes);
}

#[rstest]
#[case::required_if_triggered(json!({ "type": "company" }), "vat", "required_if:type,company", false)]
#[case::required_if_other_value(json!({ "type": "person" }), "vat", "required_if:type,company", true)]
#[case::required_with_present(json!({ "street": "Main" }), "city", "required_with:street", false)]
#[case::required_with_absent(json!({}), "city", "required_with:street", true)]
#[case::present_null(json!({ "note": null }), "note", "present", true)]
#[case::present_missing(json!({}), "note", "present", false)]
#[case::accepted(json!({ "terms": "yes" }), "terms", "accepted", true)]
#[case::not_accepted(json!({ "terms": "no" }), "terms", "accepted", false)]
fn implicit_presence_rules(
    #[case] input: Value,
    #[case] key: &str,
    #[case] rules: &str,
    #[case] passes: bool,
) {
    let validation = run(input, &[(key, rules)]);
    assert_eq!(validation.passes(), passes, "{rules}");
}

#[rstest]
#[case(json!("2024-02-10"), "date", true)]
#[case(json!("10/02/2024"), "date:d/m/Y", true)]
#[case(json!("2024-13-01"), "date", false)]
#[case(json!("abc-123"), "regex:/^[a-z]+-\\d+$/", true)]
#[case(json!("ABC-123"), "regex:/^[a-z]+-\\d+$/i", true)]
#[case(json!("ABC-123"), "regex:/^[a-z]+-\\d+$/", false)]
#[case(json!(5), "between:1,10", true)]
#[case(json!("hello world"), "between:1,10", false)]
#[case(json!([1, 2, 3]), "max:2", false)]
#[case(json!("12345"), "digits:5", true)]
#[case(json!("red"), "in:red,green,blue", true)]
#[case(json!(["red", "pink"]), "in:red,green,blue", false)]
#[case(json!("root"), "not_in:root,admin", false)]
#[case(json!("{\"a\":1}"), "json", true)]
#[case(json!("10.0.0.1"), "ip", true)]
#[case(json!("1"), "boolean", true)]
#[case(json!({ "a": 1 }), "array", true)]
fn single_rules(#[case] value: Value, #[case] rules: &str, #[case] passes: bool) {
    let validation = run(json!({ "field": value }), &[("field", rules)]);
    assert_eq!(validation.passes(), passes, "{rules}");
}

#[test]
fn same_and_different_read_other_fields() {
    let validation = run(
        json!({ "password": "s3cret", "confirm": "s3cret", "old": "s3cret" }),
        &[("confirm", "same:password"), ("password", "different:old")],
    );

    assert_eq!(validation.errors().keys(), ["password"]);
    assert_eq!(
        validation.errors().first("password"),
        Some("The Password must be different with old")
    );
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn attribute_rule_message_beats_rule_message() {
    let validation = Validator::new()
        .validate_with_messages(
            json!({}),
            [("email", "required"), ("name", "required")],
            [("required", "Fill in :attribute"), ("email:required", "We need your email")],
        )
        .unwrap();

    assert_eq!(validation.errors().first("email"), Some("We need your email"));
    assert_eq!(validation.errors().first("name"), Some("Fill in Name"));
}

#[test]
fn list_parameters_render_readably() {
    let validation = run(json!({ "size": "xl" }), &[("size", "in:s,m,l")]);
    assert_eq!(validation.errors().first("size"), Some("The Size only allows s, m or l"));
}

#[test]
fn aliases_for_wildcard_keys() {
    let mut validation = Validator::new()
        .make(
            json!({ "users": [{ "email": "" }, { "email": "" }] }),
            [("users.*.email", "required")],
        )
        .unwrap();
    validation.set_aliases([("users.*.email", "Member email"), ("users.1.email", "Backup email")]);
    validation.validate().unwrap();

    assert_eq!(
        validation.errors().all(),
        ["The Member email is required", "The Backup email is required"]
    );
}

#[test]
fn raw_keys_when_humanizing_is_off() {
    let mut validator = Validator::new();
    validator.use_humanized_keys(false);

    let validation = validator
        .validate(json!({}), [("first_name", "required")])
        .unwrap();
    assert_eq!(validation.errors().first("first_name"), Some("The first_name is required"));
}

#[test]
fn value_placeholder_is_stringified() {
    let validation = Validator::new()
        .validate_with_messages(
            json!({ "ids": [1, 1] }),
            [("ids", "distinct")],
            [("distinct", ":attribute has duplicates in :value")],
        )
        .unwrap();

    assert_eq!(validation.errors().first("ids"), Some("Ids has duplicates in [1,1]"));
}

#[test]
fn error_bag_serializes_nested() {
    let validation = run(json!({ "age": 3 }), &[("age", "min:18"), ("name", "required")]);

    assert_eq!(
        serde_json::to_value(validation.errors()).unwrap(),
        json!({
            "age": { "min": "The Age minimum is 18" },
            "name": { "required": "The Name is required" }
        })
    );
}

// ============================================================================
// DATA VIEWS
// ============================================================================

#[test]
fn validated_data_merges_both_views() {
    let validation = run(
        json!({ "name": "Ann", "age": 3, "extra": true }),
        &[("name", "required"), ("age", "min:18")],
    );

    assert_eq!(validation.valid_data(), json!({ "name": "Ann" }));
    assert_eq!(validation.invalid_data(), json!({ "age": 3 }));
    assert_eq!(validation.validated_data(), json!({ "name": "Ann", "age": 3 }));
    assert!(validation.outcome().is_partitioned());
}

#[test]
fn validated_data_keeps_wildcard_siblings() {
    let validation = run(
        json!({ "users": [{ "email": "a@x.io" }, { "email": "nope" }] }),
        &[("users.*.email", "email")],
    );

    assert_eq!(
        validation.validated_data(),
        json!({ "users": { "0": { "email": "a@x.io" }, "1": { "email": "nope" } } })
    );
}

#[test]
fn dotted_attribute_lands_nested() {
    let validation = run(
        json!({ "profile": { "name": "Ann", "age": 3 } }),
        &[("profile.name", "required"), ("profile.age", "min:18")],
    );

    assert_eq!(validation.valid_data(), json!({ "profile": { "name": "Ann" } }));
    assert_eq!(validation.invalid_data(), json!({ "profile": { "age": 3 } }));
}

// ============================================================================
// PRESENCE VERIFIER
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    rows: HashMap<&'static str, Vec<(String, Value)>>,
}

impl MemoryStore {
    fn with_users() -> Self {
        let mut rows = HashMap::new();
        rows.insert(
            "users",
            vec![
                ("1".to_owned(), json!({ "email": "taken@x.io" })),
                ("2".to_owned(), json!({ "email": "other@x.io" })),
            ],
        );
        Self { rows }
    }
}

impl PresenceVerifier for MemoryStore {
    fn count(&self, collection: &str, column: &str, value: &Value, exclude: Option<&str>) -> usize {
        self.rows.get(collection).map_or(0, |rows| {
            rows.iter()
                .filter(|(id, row)| exclude != Some(id.as_str()) && row.get(column) == Some(value))
                .count()
        })
    }
}

#[rstest]
#[case::unique_taken("taken@x.io", "unique:users", false)]
#[case::unique_free("new@x.io", "unique:users,email", true)]
#[case::unique_except_self("taken@x.io", "unique:users,email,1", true)]
#[case::exists("other@x.io", "exists:users", true)]
#[case::missing("nobody@x.io", "exists:users,email", false)]
fn storage_rules(#[case] email: &str, #[case] rules: &str, #[case] passes: bool) {
    let validator = Validator::new().with_presence_verifier(Arc::new(MemoryStore::with_users()));
    let validation = validator.validate(json!({ "email": email }), [("email", rules)]).unwrap();
    assert_eq!(validation.passes(), passes, "{rules}");
}

#[test]
fn storage_rule_without_verifier_is_an_error() {
    let err = Validator::new()
        .validate(json!({ "email": "a@x.io" }), [("email", "exists:users")])
        .unwrap_err();
    assert!(matches!(err, ValidatorError::MissingPresenceVerifier { .. }));
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[rstest]
#[case("bogus", "RULE_UNKNOWN")]
#[case(":5", "RULE_INVALID_SPEC")]
#[case("regex:/[/", "RULE_INVALID_PARAMETER")]
fn unresolvable_rules(#[case] rules: &str, #[case] code: &str) {
    let err = Validator::new().make(json!({}), [("field", rules)]).unwrap_err();
    assert_eq!(err.code(), code);
}

#[test]
fn missing_parameter_surfaces_on_validate() {
    let mut validation = Validator::new()
        .make(json!({ "n": 3 }), [("n", "min")])
        .unwrap();
    let err = validation.validate().unwrap_err();
    assert_eq!(
        err,
        ValidatorError::MissingParameter { rule: "min".into(), parameter: "min".into() }
    );
}

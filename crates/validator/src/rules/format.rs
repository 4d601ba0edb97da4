//! String format rules
//!
//! Non-string values fail every rule here except where noted.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::{Parameters, Rule, RuleContext, ValidatorError};
use crate::macros::rule;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

fn text(value: &Value) -> Option<&str> {
    value.as_str()
}

// ============================================================================
// NETWORK FORMATS
// ============================================================================

rule! {
    /// Validates email format.
    pub Email => "email";
    message "The :attribute is not valid email";
    check(value) { text(value).is_some_and(|s| EMAIL_REGEX.is_match(s)) }
    fn email();
}

rule! {
    /// Absolute URL with a scheme and a host.
    pub Url => "url";
    message "The :attribute is not valid url";
    check(value) {
        text(value)
            .and_then(|s| url::Url::parse(s).ok())
            .is_some_and(|parsed| parsed.has_host())
    }
    fn url();
}

rule! {
    /// IPv4 or IPv6 address.
    pub Ip => "ip";
    message "The :attribute is not valid IP Address";
    check(value) { text(value).is_some_and(|s| s.parse::<std::net::IpAddr>().is_ok()) }
    fn ip();
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

rule! {
    /// Letters only.
    pub Alpha => "alpha";
    message "The :attribute only allows alphabet characters";
    check(value) { text(value).is_some_and(|s| s.chars().all(char::is_alphabetic)) }
    fn alpha();
}

rule! {
    /// Letters and digits only.
    pub AlphaNum => "alpha_num";
    message "The :attribute only allows alphabet and numeric";
    check(value) {
        match value {
            Value::Number(_) => true,
            _ => text(value).is_some_and(|s| s.chars().all(char::is_alphanumeric)),
        }
    }
    fn alpha_num();
}

rule! {
    /// Letters, digits, dashes and underscores.
    pub AlphaDash => "alpha_dash";
    message "The :attribute only allows a-z, 0-9, _ and -";
    check(value) {
        match value {
            Value::Number(_) => true,
            _ => text(value)
                .is_some_and(|s| s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')),
        }
    }
    fn alpha_dash();
}

rule! {
    pub Lowercase => "lowercase";
    message "The :attribute must be lowercase";
    check(value) { text(value).is_some_and(|s| s.to_lowercase() == s) }
    fn lowercase();
}

rule! {
    pub Uppercase => "uppercase";
    message "The :attribute must be uppercase";
    check(value) { text(value).is_some_and(|s| s.to_uppercase() == s) }
    fn uppercase();
}

rule! {
    /// A string holding a JSON document.
    pub Json => "json";
    message "The :attribute must be a valid JSON string";
    check(value) { text(value).is_some_and(|s| serde_json::from_str::<Value>(s).is_ok()) }
    fn json();
}

// ============================================================================
// REGEX
// ============================================================================

/// Matches the value against a pattern.
///
/// Accepts delimited patterns (`/^[a-z]+$/i`) as well as bare ones. The
/// pattern is compiled when the rule is built, so a broken pattern is
/// reported while rules are resolved rather than during validation.
#[derive(Debug, Clone)]
pub struct MatchesRegex {
    params: Parameters,
    message: Cow<'static, str>,
    pattern: Option<Regex>,
}

impl MatchesRegex {
    pub const KEY: &'static str = "regex";
    pub const MESSAGE: &'static str = "The :attribute is not valid format";

    /// Builds the rule from its string argument.
    ///
    /// A missing argument is allowed here and reported by
    /// [`check`](Rule::check).
    pub fn from_args(args: &[String]) -> Result<Self, ValidatorError> {
        let params = Parameters::bind(&["regex"], args);
        let pattern = params
            .get("regex")
            .map(|raw| compile(raw).map_err(|e| ValidatorError::invalid_parameter(Self::KEY, "regex", e.to_string())))
            .transpose()?;

        Ok(Self {
            params,
            message: Cow::Borrowed(Self::MESSAGE),
            pattern,
        })
    }

    /// Builds the rule from a pattern.
    pub fn new(pattern: &str) -> Result<Self, ValidatorError> {
        Self::from_args(&[pattern.to_owned()])
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for MatchesRegex {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn check(&mut self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, ValidatorError> {
        let pattern = self
            .pattern
            .as_ref()
            .ok_or_else(|| ValidatorError::missing_parameter(Self::KEY, "regex"))?;

        Ok(match value {
            Value::String(s) => pattern.is_match(s),
            Value::Number(n) => pattern.is_match(&n.to_string()),
            _ => false,
        })
    }
}

/// Builds a pattern from a matching rule argument.
pub fn matches_regex(pattern: &str) -> Result<MatchesRegex, ValidatorError> {
    MatchesRegex::new(pattern)
}

/// Compiles `/body/flags` into `(?flags)body`; other input is used as is.
fn compile(raw: &str) -> Result<Regex, regex::Error> {
    let Some(delimiter) = raw
        .chars()
        .next()
        .filter(|c| matches!(c, '/' | '#' | '~' | '!' | '@' | '%' | '|' | '+'))
    else {
        return Regex::new(raw);
    };

    let body_start = delimiter.len_utf8();
    let Some(end) = raw[body_start..].rfind(delimiter).map(|i| i + body_start) else {
        return Regex::new(raw);
    };

    let flags = &raw[end + delimiter.len_utf8()..];
    if !flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u' | 'U' | 'D')) {
        return Regex::new(raw);
    }

    let body = &raw[body_start..end];
    let inline: String = flags
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'U'))
        .collect();

    if inline.is_empty() {
        Regex::new(body)
    } else {
        Regex::new(&format!("(?{inline}){body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn passes(rule: &mut dyn Rule, value: Value) -> bool {
        let input = json!({ "field": value.clone() });
        let ctx = RuleContext::new("field", "field", &[], &input);
        rule.check(&value, &ctx).unwrap()
    }

    #[test]
    fn test_email() {
        assert!(passes(&mut email(), json!("user@example.com")));
        assert!(!passes(&mut email(), json!("invalid")));
        assert!(!passes(&mut email(), json!("@example.com")));
        assert!(!passes(&mut email(), json!("user@")));
        assert!(!passes(&mut email(), json!(42)));
    }

    #[test]
    fn test_url() {
        assert!(passes(&mut url(), json!("http://example.com")));
        assert!(passes(&mut url(), json!("ftp://files.example.com/a")));
        assert!(!passes(&mut url(), json!("example.com")));
        assert!(!passes(&mut url(), json!("mailto:user@example.com")));
    }

    #[rstest]
    #[case(json!("127.0.0.1"), true)]
    #[case(json!("::1"), true)]
    #[case(json!("256.0.0.1"), false)]
    #[case(json!("localhost"), false)]
    fn test_ip(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(passes(&mut ip(), value), ok);
    }

    #[rstest]
    #[case("abc", true, true, true)]
    #[case("abc123", false, true, true)]
    #[case("abc-12_3", false, false, true)]
    #[case("abc 123", false, false, false)]
    fn character_classes(#[case] s: &str, #[case] a: bool, #[case] an: bool, #[case] ad: bool) {
        assert_eq!(passes(&mut alpha(), json!(s)), a);
        assert_eq!(passes(&mut alpha_num(), json!(s)), an);
        assert_eq!(passes(&mut alpha_dash(), json!(s)), ad);
    }

    #[test]
    fn test_case_rules() {
        assert!(passes(&mut lowercase(), json!("hello 1")));
        assert!(!passes(&mut lowercase(), json!("Hello")));
        assert!(passes(&mut uppercase(), json!("HELLO")));
        assert!(!passes(&mut uppercase(), json!("HeLLO")));
    }

    #[test]
    fn test_json() {
        assert!(passes(&mut json(), json!(r#"{"a": [1, 2]}"#)));
        assert!(!passes(&mut json(), json!("{a: 1}")));
        assert!(!passes(&mut json(), json!({"a": 1})));
    }

    #[test]
    fn test_regex_delimited() {
        let mut rule = matches_regex("/^[a-z]{2,4}$/i").unwrap();
        assert!(passes(&mut rule, json!("AbC")));
        assert!(!passes(&mut rule, json!("abcde")));
    }

    #[test]
    fn test_regex_bare() {
        let mut rule = matches_regex(r"^\d{3}-\d{4}$").unwrap();
        assert!(passes(&mut rule, json!("123-4567")));
        assert!(!passes(&mut rule, json!("invalid")));
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let err = matches_regex("/([a-z]/").unwrap_err();
        assert_eq!(err.code(), "RULE_INVALID_PARAMETER");
    }

    #[test]
    fn test_regex_without_pattern() {
        let mut rule = MatchesRegex::from_args(&[]).unwrap();
        let input = json!({});
        let ctx = RuleContext::new("a", "a", &[], &input);
        let err = rule.check(&json!("x"), &ctx).unwrap_err();
        assert_eq!(err, ValidatorError::missing_parameter("regex", "regex"));
    }
}

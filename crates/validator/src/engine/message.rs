//! Error message resolution
//!
//! A failing rule's message is picked from the custom messages by the most
//! specific key available, then its placeholders are filled in:
//!
//! | key                    | example               |
//! |------------------------|-----------------------|
//! | attribute:rule         | `users.0.email:email` |
//! | primary:rule           | `users.*.email:email` |
//! | attribute              | `users.0.email`       |
//! | primary                | `users.*.email`       |
//! | rule                   | `email`               |
//!
//! Without a match the rule's own template is used.

use indexmap::IndexMap;
use serde_json::Value;
use sieve_support::value::{parse_numeric, stringify};

use crate::engine::{Attribute, humanize};
use crate::foundation::Rule;

/// Message lookup settings for one validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MessageResolver<'a> {
    pub messages: &'a IndexMap<String, String>,
    pub aliases: &'a IndexMap<String, String>,
    pub separator: &'a str,
    pub humanized: bool,
}

/// The concrete key being reported and where it came from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Subject<'a> {
    pub attribute: &'a Attribute,
    pub key: &'a str,
    pub captures: &'a [String],
}

impl Subject<'_> {
    fn primary(&self) -> Option<&str> {
        self.attribute.is_wildcard().then(|| self.attribute.key())
    }
}

impl MessageResolver<'_> {
    /// Renders the message for `rule` failing on `value`.
    ///
    /// Rule parameters are substituted after `:attribute` and `:value`, so a
    /// parameter with one of those names shadows the built-in placeholder
    /// (`required_if` renders its own `:value`, not the field's).
    pub fn resolve(&self, subject: Subject<'_>, value: &Value, rule: &dyn Rule) -> String {
        let template = self.template(subject, rule);

        let mut vars = vec![
            ("attribute".to_owned(), self.attribute_name(subject)),
            ("value".to_owned(), stringify(value)),
        ];
        vars.extend(
            rule.parameters()
                .iter()
                .map(|(name, value)| (name.to_owned(), value.to_owned())),
        );
        vars.extend(rule.parameter_texts());

        let message = replace_placeholders(template, &vars);
        replace_captures(message, subject.captures)
    }

    fn template<'t>(&'t self, subject: Subject<'_>, rule: &'t dyn Rule) -> &'t str {
        let rule_key = rule.key();
        let sep = self.separator;
        let primary = subject.primary();

        let mut keys = vec![format!("{}{sep}{rule_key}", subject.key)];
        if let Some(primary) = primary {
            keys.push(format!("{primary}{sep}{rule_key}"));
        }
        keys.push(subject.key.to_owned());
        if let Some(primary) = primary {
            keys.push(primary.to_owned());
        }
        keys.push(rule_key.to_owned());

        keys.iter()
            .find_map(|key| self.messages.get(key))
            .map_or_else(|| rule.message(), String::as_str)
    }

    /// Name substituted for `:attribute`.
    fn attribute_name(&self, subject: Subject<'_>) -> String {
        let from_wildcard = subject.attribute.is_wildcard();
        let own = (!from_wildcard).then(|| subject.attribute.alias()).flatten();

        own.or_else(|| self.aliases.get(subject.key).map(String::as_str))
            .or_else(|| {
                subject
                    .primary()
                    .and_then(|primary| self.aliases.get(primary))
                    .map(String::as_str)
            })
            .map_or_else(
                || {
                    if self.humanized {
                        humanize(subject.key, from_wildcard)
                    } else {
                        subject.key.to_owned()
                    }
                },
                str::to_owned,
            )
    }
}

/// Substitutes `:name` placeholders in one pass. Where names overlap
/// (`:min` and `:min_length`) the longest one wins; between equal names
/// the later entry wins.
fn replace_placeholders(template: &str, vars: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let hit = vars
            .iter()
            .filter(|(name, _)| !name.is_empty() && after.starts_with(name.as_str()))
            .max_by_key(|(name, _)| name.len());

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// `[i]` becomes the i-th capture, `{i}` the capture plus one when numeric.
fn replace_captures(mut message: String, captures: &[String]) -> String {
    for (i, capture) in captures.iter().enumerate() {
        message = message.replace(&format!("[{i}]"), capture);

        let ordinal = format!("{{{i}}}");
        if message.contains(&ordinal)
            && let Some(n) = parse_numeric(capture)
        {
            let trimmed = capture.trim();
            let next = match trimmed.parse::<i64>() {
                Ok(int) => int.checked_add(1).map_or_else(|| capture.clone(), |m| m.to_string()),
                // integer too wide for i64
                Err(_) if trimmed.bytes().all(|b| b.is_ascii_digit()) => capture.clone(),
                Err(_) => (n + 1.0).to_string(),
            };
            message = message.replace(&ordinal, &next);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{between, email, required};
    use serde_json::json;

    fn resolver<'a>(messages: &'a IndexMap<String, String>, aliases: &'a IndexMap<String, String>) -> MessageResolver<'a> {
        MessageResolver {
            messages,
            aliases,
            separator: ":",
            humanized: true,
        }
    }

    #[test]
    fn placeholders_longest_first() {
        let vars = vec![
            ("min".to_owned(), "1".to_owned()),
            ("min_length".to_owned(), "3".to_owned()),
        ];
        assert_eq!(replace_placeholders(":min / :min_length / :max", &vars), "1 / 3 / :max");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let vars = vec![
            ("value".to_owned(), ":attribute".to_owned()),
            ("attribute".to_owned(), "Name".to_owned()),
        ];
        assert_eq!(replace_placeholders(":attribute got :value", &vars), "Name got :attribute");
    }

    #[test]
    fn rule_parameter_shadows_value() {
        let attribute = Attribute::new("vat", vec![]);
        let messages = IndexMap::new();
        let aliases = IndexMap::new();
        let subject = Subject { attribute: &attribute, key: "vat", captures: &[] };

        let rule = crate::rules::required_if("kind", "company");
        let message = resolver(&messages, &aliases).resolve(subject, &json!(null), &rule);
        assert_eq!(message, "The Vat is required if kind has value company");
    }

    #[test]
    fn captures_raw_and_one_based() {
        let captures = vec!["0".to_owned(), "admins".to_owned()];
        let message = replace_captures("Row {0} ([0]) in [1] {1}".to_owned(), &captures);
        assert_eq!(message, "Row 1 (0) in admins {1}");
    }

    #[test]
    fn largest_index_capture_is_kept_as_is() {
        let captures = vec!["9223372036854775807".to_owned(), "18446744073709551615".to_owned()];
        let message = replace_captures("Row {0} of {1}".to_owned(), &captures);
        assert_eq!(message, "Row 9223372036854775807 of 18446744073709551615");
    }

    #[test]
    fn template_priority() {
        let attribute = Attribute::new("users.*.email", vec![Box::new(required())]);
        let aliases = IndexMap::new();
        let rule = required();
        let subject = Subject {
            attribute: &attribute,
            key: "users.0.email",
            captures: &["0".to_owned()],
        };

        let mut messages = IndexMap::new();
        messages.insert("required".to_owned(), "rule".to_owned());
        assert_eq!(resolver(&messages, &aliases).template(subject, &rule), "rule");

        messages.insert("users.*.email".to_owned(), "primary".to_owned());
        assert_eq!(resolver(&messages, &aliases).template(subject, &rule), "primary");

        messages.insert("users.0.email".to_owned(), "attribute".to_owned());
        assert_eq!(resolver(&messages, &aliases).template(subject, &rule), "attribute");

        messages.insert("users.*.email:required".to_owned(), "primary rule".to_owned());
        assert_eq!(resolver(&messages, &aliases).template(subject, &rule), "primary rule");

        messages.insert("users.0.email:required".to_owned(), "attribute rule".to_owned());
        assert_eq!(resolver(&messages, &aliases).template(subject, &rule), "attribute rule");
    }

    #[test]
    fn attribute_names() {
        let plain = Attribute::new("email", vec![Box::new(email())]).with_alias(Some("E-mail".into()));
        let wildcard = Attribute::new("users.*.email", vec![Box::new(email())]);
        let messages = IndexMap::new();
        let mut aliases = IndexMap::new();

        let plain_subject = Subject { attribute: &plain, key: "email", captures: &[] };
        let captures = ["1".to_owned()];
        let wild_subject = Subject { attribute: &wildcard, key: "users.1.email", captures: &captures };

        assert_eq!(resolver(&messages, &aliases).attribute_name(plain_subject), "E-mail");
        assert_eq!(resolver(&messages, &aliases).attribute_name(wild_subject), "Users 2 email");

        aliases.insert("users.*.email".to_owned(), "Member email".to_owned());
        assert_eq!(resolver(&messages, &aliases).attribute_name(wild_subject), "Member email");

        aliases.insert("users.1.email".to_owned(), "Second email".to_owned());
        assert_eq!(resolver(&messages, &aliases).attribute_name(wild_subject), "Second email");

        let no_aliases = IndexMap::new();
        let raw = MessageResolver { humanized: false, ..resolver(&messages, &no_aliases) };
        assert_eq!(raw.attribute_name(wild_subject), "users.1.email");
    }

    #[test]
    fn renders_parameters_and_value() {
        let attribute = Attribute::new("age", vec![]);
        let messages = IndexMap::new();
        let aliases = IndexMap::new();
        let subject = Subject { attribute: &attribute, key: "age", captures: &[] };

        let message = resolver(&messages, &aliases).resolve(subject, &json!(99), &between(18, 65));
        assert_eq!(message, "The Age must be between 18 and 65");

        let mut messages = IndexMap::new();
        messages.insert("between".to_owned(), ":value is outside :min-:max".to_owned());
        let message = resolver(&messages, &aliases).resolve(subject, &json!(99), &between(18, 65));
        assert_eq!(message, "99 is outside 18-65");
    }
}

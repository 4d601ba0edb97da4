//! Numeric and size rules
//!
//! `min`, `max` and `between` compare the value's size: numbers by value,
//! strings by character count, arrays and objects by element count.

use serde_json::Value;
use sieve_support::value::as_number;

use crate::macros::rule;
use crate::rules::size_of;

rule! {
    /// A number, or a string that reads as one.
    pub Numeric => "numeric";
    message "The :attribute must be numeric";
    check(value) { as_number(value).is_some() }
    fn numeric();
}

rule! {
    /// A whole number, or a string of an optional sign and digits.
    pub Integer => "integer";
    message "The :attribute must be integer";
    check(value) {
        match value {
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) => s.parse::<i64>().is_ok(),
            _ => false,
        }
    }
    fn integer();
}

rule! {
    /// Exactly `length` decimal digits.
    pub Digits => "digits" ["length"];
    message "The :attribute must be numeric and must have an exact length of :length";
    check(self, value, ctx) {
        let length = self.params.number(Self::KEY, "length")?;
        let text = match value {
            Value::Number(n) if n.is_u64() => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return Ok(false),
        };
        #[allow(clippy::cast_precision_loss)]
        let count = text.chars().count() as f64;
        Ok(text.chars().all(|c| c.is_ascii_digit()) && count == length)
    }
    fn digits(length);
}

rule! {
    pub Min => "min" ["min"];
    message "The :attribute minimum is :min";
    check(self, value, ctx) {
        let min = self.params.number(Self::KEY, "min")?;
        Ok(size_of(value).is_some_and(|size| size >= min))
    }
    fn min(min);
}

rule! {
    pub Max => "max" ["max"];
    message "The :attribute maximum is :max";
    check(self, value, ctx) {
        let max = self.params.number(Self::KEY, "max")?;
        Ok(size_of(value).is_some_and(|size| size <= max))
    }
    fn max(max);
}

rule! {
    /// Size within `min..=max`.
    pub Between => "between" ["min", "max"];
    message "The :attribute must be between :min and :max";
    check(self, value, ctx) {
        self.params.require(Self::KEY, &["min", "max"])?;
        let min = self.params.number(Self::KEY, "min")?;
        let max = self.params.number(Self::KEY, "max")?;
        Ok(size_of(value).is_some_and(|size| (min..=max).contains(&size)))
    }
    fn between(min, max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Rule, RuleContext};
    use rstest::rstest;
    use serde_json::json;

    fn passes(rule: &mut dyn Rule, value: Value) -> bool {
        let input = json!({ "n": value.clone() });
        let ctx = RuleContext::new("n", "n", &[], &input);
        rule.check(&value, &ctx).unwrap()
    }

    #[rstest]
    #[case(json!(5), true)]
    #[case(json!(-2.5), true)]
    #[case(json!("12.5"), true)]
    #[case(json!(" 7 "), true)]
    #[case(json!("1e3"), true)]
    #[case(json!("abc"), false)]
    #[case(json!(true), false)]
    #[case(json!(null), false)]
    fn test_numeric(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(passes(&mut numeric(), value), ok);
    }

    #[rstest]
    #[case(json!(5), true)]
    #[case(json!("-12"), true)]
    #[case(json!(5.5), false)]
    #[case(json!("5.0"), false)]
    #[case(json!("x"), false)]
    fn test_integer(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(passes(&mut integer(), value), ok);
    }

    #[test]
    fn test_digits() {
        assert!(passes(&mut digits(4), json!("0042")));
        assert!(passes(&mut digits(3), json!(123)));
        assert!(!passes(&mut digits(4), json!("42")));
        assert!(!passes(&mut digits(2), json!("4a")));
    }

    #[test]
    fn test_size_by_kind() {
        assert!(passes(&mut min(3), json!(3)));
        assert!(!passes(&mut min(3), json!(2.9)));
        assert!(passes(&mut min(3), json!("abc")));
        assert!(!passes(&mut min(3), json!("ab")));
        assert!(passes(&mut max(2), json!([1, 2])));
        assert!(!passes(&mut max(2), json!({"a": 1, "b": 2, "c": 3})));
        assert!(passes(&mut between(1, 3), json!("héé")));
        assert!(!passes(&mut between(1, 3), json!(4)));
    }

    #[test]
    fn missing_bound_is_an_error() {
        let input = json!({});
        let ctx = RuleContext::new("n", "n", &[], &input);

        let err = Between::from_args(&["1".into()]).check(&json!(2), &ctx).unwrap_err();
        assert_eq!(err.code(), "RULE_MISSING_PARAMETER");

        let err = min("lots").check(&json!(2), &ctx).unwrap_err();
        assert_eq!(err.code(), "RULE_INVALID_PARAMETER");
    }
}

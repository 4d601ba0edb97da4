//! Date format rule
//!
//! Formats use the familiar `Y-m-d` letters and are translated to
//! `chrono` strftime items before parsing.

use chrono::format::{Parsed, StrftimeItems, parse};

use crate::macros::rule;

/// Format used when the rule has no argument.
pub const DEFAULT_FORMAT: &str = "Y-m-d";

rule! {
    /// A string matching the given date format exactly.
    pub Date => "date" ["format"];
    message "The :attribute is not valid date format";
    check(self, value, ctx) {
        let format = self.params.get("format").unwrap_or(DEFAULT_FORMAT);
        let Some(text) = value.as_str() else {
            return Ok(false);
        };

        let pattern = translate(format);
        let mut parsed = Parsed::new();
        Ok(parse(&mut parsed, text, StrftimeItems::new(&pattern)).is_ok())
    }
    fn date(format);
}

/// Translates date format letters into strftime directives.
///
/// A backslash escapes the next character. Unknown letters are kept as
/// literals.
fn translate(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let directive = match c {
            'Y' => "%Y",
            'y' => "%y",
            'm' | 'n' => "%m",
            'd' | 'j' => "%d",
            'H' | 'G' => "%H",
            'h' | 'g' => "%I",
            'i' => "%M",
            's' => "%S",
            'A' | 'a' => "%p",
            'D' => "%a",
            'l' => "%A",
            'M' => "%b",
            'F' => "%B",
            'U' => "%s",
            'e' | 'T' => "%Z",
            'P' => "%:z",
            'O' => "%z",
            '%' => "%%",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped);
                }
                continue;
            }
            other => {
                push_literal(&mut out, other);
                continue;
            }
        };
        out.push_str(directive);
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

//! Wildcard attribute keys
//!
//! `users.*.email` is compiled once into literal and wildcard segments.
//! [`PathPattern::expand`] walks the input to list the concrete keys it
//! covers; [`PathPattern::captures`] goes the other way and matches a
//! concrete key.

use serde_json::Value;
use smallvec::SmallVec;
use sieve_support::arr;

/// Values matched by the wildcards of a key, left to right.
pub type Captures = SmallVec<[String; 2]>;

/// The wildcard segment.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

/// A compiled attribute key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// One concrete key produced by [`PathPattern::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    path: String,
    captures: Captures,
}

impl Expansion {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Captures) {
        (self.path, self.captures)
    }
}

impl PathPattern {
    /// Splits `raw` into segments.
    #[must_use]
    pub fn compile(raw: &str) -> Self {
        let segments = raw
            .split(arr::DELIMITER)
            .map(|segment| match segment {
                WILDCARD => Segment::Wildcard,
                literal => Segment::Literal(literal.to_owned()),
            })
            .collect();

        Self {
            raw: raw.to_owned(),
            segments,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| *s == Segment::Wildcard)
    }

    /// Matches a concrete key, returning what each wildcard stood for.
    ///
    /// ```
    /// use sieve_validator::engine::PathPattern;
    ///
    /// let pattern = PathPattern::compile("users.*.tags.*");
    /// let captures = pattern.captures("users.3.tags.0").unwrap();
    /// assert_eq!(captures.as_slice(), ["3", "0"]);
    /// assert!(pattern.captures("users.3.name").is_none());
    /// ```
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Captures> {
        let mut captures = Captures::new();
        let mut parts = path.split(arr::DELIMITER);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Wildcard if part.is_empty() => return None,
                Segment::Wildcard => captures.push(part.to_owned()),
            }
        }

        parts.next().is_none().then_some(captures)
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Lists the concrete keys this pattern covers in `input`.
    ///
    /// A key without wildcards expands to itself. A wildcard enumerates the
    /// keys of the object or the indices of the array it lands on, skipping
    /// keys that contain a dot; over a missing or scalar value it yields
    /// nothing. Literal segments after a wildcard are kept even when the
    /// element lacks them, so `required` can report the gap.
    ///
    /// ```
    /// use serde_json::json;
    /// use sieve_validator::engine::PathPattern;
    ///
    /// let input = json!({ "users": [{ "email": "a@x.io" }, { "name": "b" }] });
    /// let paths: Vec<_> = PathPattern::compile("users.*.email")
    ///     .expand(&input)
    ///     .into_iter()
    ///     .map(|e| e.path().to_owned())
    ///     .collect();
    /// assert_eq!(paths, ["users.0.email", "users.1.email"]);
    /// ```
    #[must_use]
    pub fn expand(&self, input: &Value) -> Vec<Expansion> {
        let Some(first_wildcard) = self.segments.iter().position(|s| *s == Segment::Wildcard) else {
            return vec![Expansion {
                path: self.raw.clone(),
                captures: Captures::new(),
            }];
        };

        let prefix = self.segments[..first_wildcard]
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(literal) => Some(literal.as_str()),
                Segment::Wildcard => None,
            })
            .collect::<Vec<_>>()
            .join(".");

        let mut out = Vec::new();
        let root = arr::get(input, &prefix);
        self.walk(root, first_wildcard, prefix, Captures::new(), &mut out);

        tracing::trace!(
            pattern = %self.raw,
            expanded = out.len(),
            "expanded wildcard attribute"
        );
        out
    }

    fn walk(
        &self,
        node: Option<&Value>,
        index: usize,
        path: String,
        captures: Captures,
        out: &mut Vec<Expansion>,
    ) {
        let Some(segment) = self.segments.get(index) else {
            out.push(Expansion { path, captures });
            return;
        };

        match segment {
            Segment::Literal(literal) => {
                let child = node.and_then(|n| arr::get(n, literal));
                self.walk(child, index + 1, join(&path, literal), captures, out);
            }
            Segment::Wildcard => {
                let Some(node) = node else { return };
                for (key, child) in arr::entries(node) {
                    if key.contains(arr::DELIMITER) {
                        continue;
                    }
                    let mut captures = captures.clone();
                    captures.push(key.to_string());
                    self.walk(Some(child), index + 1, join(&path, &key), captures, out);
                }
            }
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

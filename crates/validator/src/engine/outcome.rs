//! Per-attribute results and the data views derived from them

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use sieve_support::arr;

/// Whether a concrete attribute passed all of its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Valid,
    Invalid,
}

/// The result of every concrete attribute of a run, in validation order.
///
/// Valid and invalid data are views over this single map, so a key can
/// never be reported as both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    entries: IndexMap<String, (Status, Value)>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result for `key`, replacing any earlier one.
    pub fn record(&mut self, key: impl Into<String>, status: Status, value: Value) {
        self.entries.insert(key.into(), (status, value));
    }

    #[must_use]
    pub fn status(&self, key: &str) -> Option<Status> {
        self.entries.get(key).map(|(status, _)| *status)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Status, &Value)> {
        self.entries
            .iter()
            .map(|(key, (status, value))| (key.as_str(), *status, value))
    }

    /// Nested data of the attributes that passed.
    #[must_use]
    pub fn valid_data(&self) -> Value {
        self.views().0
    }

    /// Nested data of the attributes that failed.
    #[must_use]
    pub fn invalid_data(&self) -> Value {
        self.views().1
    }

    /// Every recorded value in one nested tree, valid or not. Siblings under
    /// a shared parent are kept together.
    #[must_use]
    pub fn validated_data(&self) -> Value {
        let mut merged = Value::Object(Map::new());
        for (key, (_, value)) in &self.entries {
            arr::set(&mut merged, key, value.clone());
        }
        merged
    }

    /// Replays the entries: each one is set on its own view and erased from
    /// the other.
    fn views(&self) -> (Value, Value) {
        let mut valid = Value::Object(Map::new());
        let mut invalid = Value::Object(Map::new());

        for (key, (status, value)) in &self.entries {
            let (target, other) = match status {
                Status::Valid => (&mut valid, &mut invalid),
                Status::Invalid => (&mut invalid, &mut valid),
            };
            arr::set(target, key, value.clone());
            arr::erase(other, key.as_str());
        }

        (valid, invalid)
    }

    /// Checks that no recorded key appears in both views.
    ///
    /// Overlap is tolerated only between keys nested in one another
    /// (`a` valid, `a.b` invalid).
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        let (valid, invalid) = self.views();

        self.entries.iter().all(|(key, (status, _))| {
            let (own, other) = match status {
                Status::Valid => (&valid, &invalid),
                Status::Invalid => (&invalid, &valid),
            };
            let nested = self.entries.iter().any(|(candidate, (candidate_status, _))| {
                candidate_status != status && (is_nested(candidate, key) || is_nested(key, candidate))
            });
            nested || !(arr::has(own, key) && arr::has(other, key))
        })
    }
}

/// Whether `inner` lies strictly below `outer`.
fn is_nested(inner: &str, outer: &str) -> bool {
    inner
        .strip_prefix(outer)
        .is_some_and(|rest| rest.starts_with(arr::DELIMITER))
}

//! Dot-notation access to nested values
//!
//! Every function here treats a [`Value`] as an ordered associative
//! container: objects are keyed by string, arrays by their index. A path is
//! a string whose segments are joined by [`DELIMITER`].
//!
//! Two rules hold for every operation:
//!
//! - an empty path addresses the container itself;
//! - a key that exists literally (dots included) is preferred over the
//!   segment-by-segment walk.
//!
//! Arrays keep list semantics until an operation needs a key they cannot
//! hold (a non-index segment, a gap, or a removed element). At that point
//! the array is promoted to an object keyed by the original indices, which
//! is how an associative array with integer keys behaves.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::value::stringify;

/// Segment separator in paths.
pub const DELIMITER: char = '.';

// ============================================================================
// PATH LISTS
// ============================================================================

/// One path or a list of paths.
///
/// Lets [`erase`], [`except`] and [`only`] accept `"a.b"`, `&["a", "b"]`
/// or a `Vec<String>` alike.
pub trait PathList {
    /// The paths, in the order given.
    fn paths(&self) -> Vec<&str>;
}

impl PathList for str {
    fn paths(&self) -> Vec<&str> {
        vec![self]
    }
}

impl PathList for String {
    fn paths(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<S: AsRef<str>> PathList for [S] {
    fn paths(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>, const N: usize> PathList for [S; N] {
    fn paths(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>> PathList for Vec<S> {
    fn paths(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

// ============================================================================
// SINGLE-LEVEL ACCESS
// ============================================================================

/// Whether the value can hold keyed children (object or array).
#[inline]
pub fn accessible(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Whether `key` exists directly in `container`, without walking dots.
pub fn exists(container: &Value, key: &str) -> bool {
    child(container, key).is_some()
}

/// Parse an array index. Only canonical decimal forms count: `"01"` is a
/// string key, not index 1.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment.len() == 1 || !segment.starts_with('0'));
    if canonical { segment.parse().ok() } else { None }
}

fn child<'a>(container: &'a Value, segment: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(container: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match container {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

/// Child entries of a container as `(key, value)` pairs, in order.
///
/// Array indices are rendered as strings. Scalars have no children.
pub fn entries(container: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match container {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Cow::Owned(i.to_string()), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Turn `value` into an object in place and return its map.
///
/// Arrays keep their elements under their index; scalars are discarded.
fn promote_to_object(value: &mut Value) -> &mut Map<String, Value> {
    let map = match value.take() {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Map::new(),
    };
    *value = Value::Object(map);
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

/// Mutable slot for `segment`, created as `null` when missing.
fn slot<'a>(container: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = parse_index(segment)
        .filter(|&i| matches!(&*container, Value::Array(items) if i <= items.len()));

    match (container, index) {
        (Value::Array(items), Some(i)) => {
            if i == items.len() {
                items.push(Value::Null);
            }
            &mut items[i]
        }
        (container, _) => promote_to_object(container)
            .entry(segment.to_owned())
            .or_insert(Value::Null),
    }
}

fn remove_child(container: &mut Value, key: &str) -> Option<Value> {
    match container {
        Value::Object(map) => map.shift_remove(key),
        Value::Array(items) => {
            parse_index(key).filter(|&i| i < items.len())?;
            promote_to_object(container).shift_remove(key)
        }
        _ => None,
    }
}

fn walk<'a>(container: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(DELIMITER)
        .try_fold(container, |current, segment| child(current, segment))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

// ============================================================================
// CORE OPERATIONS: get / set / has / erase
// ============================================================================

/// Get the value at `path`, or `None` when any segment is missing.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let data = json!({ "users": [{ "email": "a@x.com" }] });
/// assert_eq!(arr::get(&data, "users.0.email"), Some(&json!("a@x.com")));
/// assert_eq!(arr::get(&data, "users.1.email"), None);
/// assert_eq!(arr::get(&data, ""), Some(&data));
/// ```
pub fn get<'a>(container: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(container);
    }
    if !accessible(container) {
        return None;
    }
    if let Some(value) = child(container, path) {
        return Some(value);
    }
    walk(container, path)
}

/// Get the value at `path`, falling back to `default`.
pub fn get_or<'a>(container: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    get(container, path).unwrap_or(default)
}

/// Get the value at `path`, computing the fallback only when it is needed.
pub fn get_or_else<'a, F>(container: &'a Value, path: &str, default: F) -> Cow<'a, Value>
where
    F: FnOnce() -> Value,
{
    match get(container, path) {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Owned(default()),
    }
}

/// Set `value` at `path`, creating intermediate objects as needed.
///
/// Intermediates that exist but cannot hold children are replaced with
/// empty objects. An empty path replaces the whole container.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let mut data = json!({ "a": 1 });
/// arr::set(&mut data, "a.b.c", json!(true));
/// assert_eq!(data, json!({ "a": { "b": { "c": true } } }));
/// ```
pub fn set(container: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *container = value;
        return;
    }

    let mut segments = path.split(DELIMITER).collect::<Vec<_>>();
    let last = segments.pop().unwrap_or_default();

    let mut current = container;
    for segment in segments {
        current = slot(current, segment);
        if !accessible(current) {
            *current = Value::Object(Map::new());
        }
    }

    *slot(current, last) = value;
}

/// Whether `path` resolves to a value. A present `null` counts.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let data = json!({ "a": { "b": null } });
/// assert!(arr::has(&data, "a.b"));
/// assert!(!arr::has(&data, "a.c"));
/// ```
pub fn has(container: &Value, path: &str) -> bool {
    if path.is_empty() || is_empty_container(container) {
        return false;
    }
    exists(container, path) || walk(container, path).is_some()
}

/// Remove one or more paths. Missing paths are skipped silently.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let mut data = json!({ "a": { "b": 1, "c": 2 }, "d": 3 });
/// arr::erase(&mut data, &["a.b", "d", "x.y.z"]);
/// assert_eq!(data, json!({ "a": { "c": 2 } }));
/// ```
pub fn erase<K>(container: &mut Value, keys: &K)
where
    K: PathList + ?Sized,
{
    for key in keys.paths() {
        erase_one(container, key);
    }
}

fn erase_one(container: &mut Value, key: &str) -> Option<Value> {
    if exists(container, key) {
        return remove_child(container, key);
    }

    let mut segments = key.split(DELIMITER).collect::<Vec<_>>();
    let last = segments.pop()?;

    let mut current = container;
    for segment in segments {
        current = match child_mut(current, segment) {
            Some(next) if accessible(next) => next,
            _ => return None,
        };
    }

    remove_child(current, last)
}

// ============================================================================
// DERIVED OPERATIONS
// ============================================================================

/// Set `value` at `path` only when nothing (or `null`) is there yet.
pub fn add(container: &mut Value, path: &str, value: Value) {
    if get(container, path).is_none_or(Value::is_null) {
        set(container, path, value);
    }
}

/// Copy of `container` without the given paths.
pub fn except<K>(container: &Value, keys: &K) -> Value
where
    K: PathList + ?Sized,
{
    let mut copy = container.clone();
    erase(&mut copy, keys);
    copy
}

/// Top-level subset of `container` holding only the listed keys.
///
/// Keys keep the container's order; unknown keys are ignored.
pub fn only<K>(container: &Value, keys: &K) -> Value
where
    K: PathList + ?Sized,
{
    let wanted = keys.paths();
    let subset = entries(container)
        .into_iter()
        .filter(|(key, _)| wanted.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.clone()))
        .collect::<Map<_, _>>();
    Value::Object(subset)
}

/// Remove the value at `path` and return it.
pub fn pull(container: &mut Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(container.take());
    }
    erase_one(container, path)
}

/// Flatten a nested container into dotted leaf keys.
///
/// Empty objects and arrays are kept as leaves so [`undot`] can restore
/// them.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let flat = arr::dot(&json!({ "a": { "b": 1 }, "c": [true] }));
/// let keys = flat.keys().map(String::as_str).collect::<Vec<_>>();
/// assert_eq!(keys, ["a.b", "c.0"]);
/// ```
pub fn dot(container: &Value) -> IndexMap<String, Value> {
    let mut flat = IndexMap::new();
    dot_into(container, "", &mut flat);
    flat
}

fn dot_into(value: &Value, prefix: &str, flat: &mut IndexMap<String, Value>) {
    for (key, child) in entries(value) {
        let path = if prefix.is_empty() {
            key.into_owned()
        } else {
            format!("{prefix}{DELIMITER}{key}")
        };

        if accessible(child) && !is_empty_container(child) {
            dot_into(child, &path, flat);
        } else {
            flat.insert(path, child.clone());
        }
    }
}

/// Rebuild a nested container from dotted keys.
pub fn undot<I, K>(flat: I) -> Value
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut container = Value::Object(Map::new());
    for (key, value) in flat {
        set(&mut container, key.as_ref(), value);
    }
    container
}

/// All leaf scalars, depth first.
pub fn flatten(value: &Value) -> Vec<Value> {
    let mut leaves = Vec::new();
    flatten_into(value, &mut leaves);
    leaves
}

fn flatten_into(value: &Value, leaves: &mut Vec<Value>) {
    if accessible(value) {
        for (_, child) in entries(value) {
            flatten_into(child, leaves);
        }
    } else {
        leaves.push(value.clone());
    }
}

/// Merge the children of every container child into a single list.
///
/// Scalar children are skipped.
pub fn collapse(container: &Value) -> Vec<Value> {
    entries(container)
        .into_iter()
        .filter(|(_, child)| accessible(child))
        .flat_map(|(_, child)| entries(child).into_iter().map(|(_, v)| v.clone()))
        .collect()
}

/// Split a container into its keys and its values.
pub fn divide(container: &Value) -> (Vec<String>, Vec<Value>) {
    entries(container)
        .into_iter()
        .map(|(k, v)| (k.into_owned(), v.clone()))
        .unzip()
}

/// Wrap a value in a list: `null` becomes empty, arrays pass through.
pub fn wrap(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Collect `value_path` from every child, optionally keyed by `key_path`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_support::arr;
///
/// let users = json!([{ "id": 7, "name": "Ann" }, { "id": 9, "name": "Bo" }]);
/// assert_eq!(arr::pluck(&users, "name", None), json!(["Ann", "Bo"]));
/// assert_eq!(arr::pluck(&users, "name", Some("id")), json!({ "7": "Ann", "9": "Bo" }));
/// ```
pub fn pluck(items: &Value, value_path: &str, key_path: Option<&str>) -> Value {
    let picked = entries(items).into_iter().map(|(_, item)| {
        let value = get(item, value_path).cloned().unwrap_or(Value::Null);
        let key = key_path.map(|path| get(item, path).map(stringify).unwrap_or_default());
        (key, value)
    });

    match key_path {
        Some(_) => Value::Object(
            picked
                .map(|(key, value)| (key.unwrap_or_default(), value))
                .collect(),
        ),
        None => Value::Array(picked.map(|(_, value)| value).collect()),
    }
}

/// First child passing `predicate(key, value)`.
pub fn first<'a, P>(container: &'a Value, predicate: P) -> Option<&'a Value>
where
    P: Fn(&str, &Value) -> bool,
{
    entries(container)
        .into_iter()
        .find(|(key, value)| predicate(key.as_ref(), value))
        .map(|(_, value)| value)
}

/// Last child passing `predicate(key, value)`.
pub fn last<'a, P>(container: &'a Value, predicate: P) -> Option<&'a Value>
where
    P: Fn(&str, &Value) -> bool,
{
    entries(container)
        .into_iter()
        .rev()
        .find(|(key, value)| predicate(key.as_ref(), value))
        .map(|(_, value)| value)
}

/// Children passing `predicate(key, value)`. Object keys are preserved;
/// array results are renumbered from zero.
pub fn filter<P>(container: &Value, predicate: P) -> Value
where
    P: Fn(&str, &Value) -> bool,
{
    match container {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter(|(i, v)| predicate(&i.to_string(), v))
                .map(|(_, v)| v.clone())
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, v)| predicate(k.as_str(), v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// Put `value` at the front of `container`.
///
/// With a key the container becomes (or stays) an object and the key is
/// placed first; without one, arrays get the value at index 0.
pub fn prepend(container: Value, value: Value, key: Option<&str>) -> Value {
    match (container, key) {
        (Value::Array(mut items), None) => {
            items.insert(0, value);
            Value::Array(items)
        }
        (mut container, key) => {
            let rest = promote_to_object(&mut container).clone();
            let mut map = Map::with_capacity(rest.len() + 1);
            map.insert(key.unwrap_or("0").to_owned(), value);
            for (k, v) in rest {
                map.entry(k).or_insert(v);
            }
            Value::Object(map)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Dot-path evaluation over JSON documents.
//!
//! Syntax:
//! - `key` selects an object member
//! - digits select an array element (or an object member with that name)
//! - `#` maps the remaining path over every array element and collects the
//!   matches into a new array; as the last segment it yields the array length
//! - `\.` is a literal dot inside a key
//!
//! `items.#.statistics.viewCount` against a single-item list therefore
//! yields a one-element array, which callers have to unwrap.

use serde_json::Value;
use std::borrow::Cow;

/// Splits a path into its segments, honoring `\.` escapes.
pub fn segments(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

/// Resolves `path` against `value`.
///
/// Returns `None` when any segment fails to match. Values reached without
/// a `#` segment are borrowed from the document.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<Cow<'a, Value>> {
    if path.is_empty() {
        return Some(Cow::Borrowed(value));
    }
    resolve_segments(value, &segments(path))
}

fn resolve_segments<'a>(value: &'a Value, segs: &[String]) -> Option<Cow<'a, Value>> {
    let Some((head, rest)) = segs.split_first() else {
        return Some(Cow::Borrowed(value));
    };

    if head == "#" {
        let Value::Array(items) = value else {
            return None;
        };
        if rest.is_empty() {
            return Some(Cow::Owned(Value::from(items.len())));
        }
        let matches: Vec<Value> = items
            .iter()
            .filter_map(|item| resolve_segments(item, rest))
            .map(Cow::into_owned)
            .collect();
        return Some(Cow::Owned(Value::Array(matches)));
    }

    let next = match value {
        Value::Object(map) => map.get(head.as_str())?,
        Value::Array(items) => items.get(head.parse::<usize>().ok()?)?,
        _ => return None,
    };
    resolve_segments(next, rest)
}

/// Resolves `path` and returns it as a non-empty string, if it is one.
pub fn resolve_str(value: &Value, path: &str) -> Option<String> {
    match resolve(value, path)?.as_ref() {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

//! Dot-path lookup over JSON data.
//!
//! `a.b.0.c` walks object keys and array indices. A missing segment, an
//! out-of-range index, or a scalar in the middle of the path all yield `None`;
//! missing data is never an error.

use serde_json::Value;

/// Resolve `path` against `root`. An empty path yields `root` itself.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Split `path` into its first segment and the remainder
pub fn split_first(path: &str) -> (&str, &str) {
    match path.split_once('.') {
        Some((head, rest)) => (head, rest),
        None => (path, ""),
    }
}

/// Whether a resolved value counts as present data.
///
/// `null`, `false`, empty strings, empty arrays and empty objects are absent.
/// Numbers are always present, including zero.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

/// Whether `path` resolves to present data
pub fn has_data(root: &Value, path: &str) -> bool {
    resolve(root, path).map(is_present).unwrap_or(false)
}

/// String form used for template substitution
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

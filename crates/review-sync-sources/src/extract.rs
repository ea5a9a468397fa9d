// Declarative field extraction over loosely structured provider payloads.
//
// Each logical field is described by an ordered list of paths into the raw
// item; the first path that resolves to a present value wins.

use review_sync_models::{as_int, as_text};
use serde_json::Value;

/// A nested key path, e.g. `&["guest", "name"]`
pub type FieldPath = &'static [&'static str];

/// Ordered fallback chain for one logical field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub paths: &'static [FieldPath],
}

impl FieldRule {
    pub const fn new(field: &'static str, paths: &'static [FieldPath]) -> Self {
        Self { field, paths }
    }

    /// First present value along the chain
    pub fn value<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        self.paths.iter().find_map(|path| lookup(item, path).filter(|v| is_present(v)))
    }

    /// First present value, coerced to an integer. A present but
    /// non-numeric value does not fall through to later paths.
    pub fn int(&self, item: &Value) -> Option<i64> {
        self.value(item).and_then(as_int)
    }

    /// First path holding usable text
    pub fn text(&self, item: &Value) -> Option<String> {
        self.paths.iter().find_map(|path| lookup(item, path).and_then(as_text))
    }

    pub fn text_or(&self, item: &Value, default: &str) -> String {
        self.text(item).unwrap_or_else(|| default.to_string())
    }
}

/// Walk `path` through nested objects
pub fn lookup<'a>(item: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(item, |current, key| current.as_object()?.get(*key))
}

/// Null, empty strings and empty containers count as absent; zero and false do not
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

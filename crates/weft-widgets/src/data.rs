#![forbid(unsafe_code)]

//! Loose-value data bags consumed by widgets.
//!
//! A [`DataBag`] is an insertion-ordered map of rendering directives plus
//! arbitrary pass-through HTML attributes. Each widget consumes its
//! recognized structural keys and serializes whatever is left as generic
//! attributes, so structural keys must be removed (or excluded) before the
//! attribute pass.

use indexmap::IndexMap;
use serde_json::Value;
use weft_template::AttrMap;

/// Ordered map of directive name to loose value.
#[derive(Debug, Clone, Default)]
pub struct DataBag {
    entries: IndexMap<String, Value>,
}

impl DataBag {
    /// Empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing entry under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Remove and return an entry.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Borrow an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether the key is present at all (even as `null`).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scalar entry as text: strings verbatim, numbers in decimal form,
    /// booleans as `"1"`/`"0"`. `null`, missing, and structured values
    /// yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// Scalar entry as text, with a fallback.
    pub fn text_or(&self, key: &str, fallback: &str) -> String {
        self.text(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Loose truthiness of an entry: absent, `null`, `false`, `0`, `""`,
    /// and empty collections are false; everything else is true.
    pub fn truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// New bag starting from `defaults`, overlaid with this bag's entries.
    /// Default keys keep their position; caller-only keys append after.
    pub fn with_defaults(&self, defaults: &[(&str, Value)]) -> DataBag {
        let mut merged = DataBag::new();
        for (key, value) in defaults {
            merged.insert(*key, value.clone());
        }
        for (key, value) in self.iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Remaining entries as an attribute map, skipping `exclude` keys.
    pub fn to_attrs(&self, exclude: &[&str]) -> AttrMap {
        self.entries
            .iter()
            .filter(|(key, _)| !exclude.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl From<Value> for DataBag {
    /// Build a bag from a JSON object; non-object values yield an empty bag.
    fn from(value: Value) -> Self {
        let mut bag = DataBag::new();
        if let Value::Object(map) = value {
            for (key, entry) in map {
                bag.insert(key, entry);
            }
        }
        bag
    }
}

impl FromIterator<(String, Value)> for DataBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut bag = DataBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

/// Scalar-to-text coercion shared by checked/selected comparisons.
/// Booleans map to `"1"`/`"0"` so boolean form values compare against the
/// conventional HTML encodings.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        _ => None,
    }
}

/// Loose truthiness over a loose value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Bool(true) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// String-comparison equality between two loose scalars, after boolean
/// coercion. Numeric strings compare numerically so `"1"` matches `1`.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    let (Some(a), Some(b)) = (scalar_text(a), scalar_text(b)) else {
        return false;
    };
    if a == b {
        return true;
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Membership test for multi-value fields: strict string comparison for
/// non-numeric candidates, numeric comparison when both sides parse.
pub fn loose_contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|item| {
            let strict = matches!((item, needle), (Value::String(_), Value::String(_)));
            if strict {
                scalar_text(item) == scalar_text(needle)
            } else {
                loose_eq(item, needle)
            }
        }),
        other => loose_eq(other, needle),
    }
}

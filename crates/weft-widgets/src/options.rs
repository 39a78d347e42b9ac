#![forbid(unsafe_code)]

//! Option normalization for choice widgets (select, radio, checkbox sets).
//!
//! Callers hand options in several loose shapes; everything normalizes into
//! the tagged [`OptionEntry`] form before rendering, so the group-detection
//! heuristic lives in exactly one place:
//!
//! - `{"elk": "Elk"}` - plain value/text pairs;
//! - `{"Mammals": {"elk": "Elk"}}` - non-integer key with an iterable value
//!   is a titled group;
//! - `[{"text": "Mammals", "options": {...}}]` - complex group form;
//! - `[{"value": "elk", "text": "Elk", "class": "big"}]` - complex item
//!   form, extra keys become per-option attributes;
//! - an integer key with an iterable value is a group iff the value
//!   declares an `options` sub-key or lacks a `value` key.

use crate::data::{is_truthy, scalar_text};
use serde_json::Value;
use weft_template::AttrMap;

/// One renderable option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionItem {
    pub value: String,
    pub text: String,
    pub attrs: AttrMap,
}

impl OptionItem {
    /// Item with no extra attributes.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            attrs: AttrMap::new(),
        }
    }
}

/// An option or a titled group of options.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionEntry {
    Item(OptionItem),
    Group {
        label: String,
        attrs: AttrMap,
        entries: Vec<OptionEntry>,
    },
}

fn is_integer_key(key: &str) -> bool {
    key.parse::<i64>().is_ok()
}

fn complex_item(map: &serde_json::Map<String, Value>) -> OptionItem {
    let value = map.get("value").and_then(scalar_text).unwrap_or_default();
    let text = map.get("text").and_then(scalar_text).unwrap_or_default();
    let attrs = map
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "value" | "text" | "options"))
        .map(|(key, v)| (key.clone(), v.clone()))
        .collect();
    OptionItem { value, text, attrs }
}

fn group_from_complex(key: &str, map: &serde_json::Map<String, Value>) -> OptionEntry {
    let label = map
        .get("text")
        .and_then(scalar_text)
        .unwrap_or_else(|| key.to_string());
    let attrs = map
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "text" | "options"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let entries = map.get("options").map(normalize).unwrap_or_default();
    OptionEntry::Group {
        label,
        attrs,
        entries,
    }
}

fn entry_for(key: &str, value: &Value) -> OptionEntry {
    match value {
        Value::Object(map) => {
            if !is_integer_key(key) {
                // Associative "group by label" form. A map that carries its
                // own value key is still a complex item, not a group.
                if map.contains_key("value") && !map.contains_key("options") {
                    OptionEntry::Item(complex_item(map))
                } else if map.contains_key("options") {
                    group_from_complex(key, map)
                } else {
                    OptionEntry::Group {
                        label: key.to_string(),
                        attrs: AttrMap::new(),
                        entries: normalize(value),
                    }
                }
            } else if map.contains_key("options") {
                group_from_complex(key, map)
            } else if !map.contains_key("value") {
                OptionEntry::Group {
                    label: key.to_string(),
                    attrs: AttrMap::new(),
                    entries: normalize(value),
                }
            } else {
                OptionEntry::Item(complex_item(map))
            }
        }
        Value::Array(_) => OptionEntry::Group {
            label: key.to_string(),
            attrs: AttrMap::new(),
            entries: normalize(value),
        },
        scalar => OptionEntry::Item(OptionItem::new(
            key,
            scalar_text(scalar).unwrap_or_default(),
        )),
    }
}

/// Normalize loose caller options into tagged entries.
pub fn normalize(options: &Value) -> Vec<OptionEntry> {
    match options {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| entry_for(key, value))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| entry_for(&index.to_string(), item))
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize the `empty` directive into an optional pseudo-option with an
/// empty string value: `true` gives empty text, a scalar gives that text, a
/// map may override both value and text, anything falsy gives `None`.
pub fn normalize_empty(empty: &Value) -> Option<OptionItem> {
    match empty {
        Value::Bool(true) => Some(OptionItem::new("", "")),
        Value::String(_) | Value::Number(_) => {
            Some(OptionItem::new("", scalar_text(empty).unwrap_or_default()))
        }
        Value::Object(map) => {
            let value = map.get("value").and_then(scalar_text).unwrap_or_default();
            let text = map.get("text").and_then(scalar_text).unwrap_or_default();
            Some(OptionItem::new(value, text))
        }
        other if is_truthy(other) => Some(OptionItem::new("", "")),
        _ => None,
    }
}

#![forbid(unsafe_code)]

//! HTML attribute serialization over loose values.
//!
//! Widgets collect everything they did not consume structurally into an
//! [`AttrMap`] and hand it here. Serialization preserves insertion order,
//! escapes values, and renders boolean ("minimized") attributes in the
//! `checked="checked"` form. The minimized set is explicit configuration,
//! not a global registry, so independent render pipelines never share
//! hidden state.

use crate::escape;
use crate::template::{StringTemplate, TemplateVars};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;

/// Loose-value attribute map, insertion ordered.
pub type AttrMap = IndexMap<String, Value>;

/// HTML boolean attributes rendered in minimized form.
pub const DEFAULT_MINIMIZED: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "declare",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "inert",
    "ismap",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "open",
    "readonly",
    "required",
    "reversed",
    "scoped",
    "selected",
];

/// Serializes [`AttrMap`] values into attribute strings.
#[derive(Debug, Clone)]
pub struct AttributeFormatter {
    minimized: HashSet<String>,
}

impl Default for AttributeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeFormatter {
    /// Formatter with the [`DEFAULT_MINIMIZED`] attribute set.
    pub fn new() -> Self {
        Self {
            minimized: DEFAULT_MINIMIZED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Formatter with a caller-supplied minimized set.
    pub fn with_minimized<I, S>(minimized: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            minimized: minimized.into_iter().map(Into::into).collect(),
        }
    }

    /// Serialize `attrs` into a string ready for an `{{attrs}}` slot.
    ///
    /// The result carries a leading space when non-empty, so templates can
    /// write `<input{{attrs}}>`. Keys listed in `exclude`, and values that
    /// are `null`, `false`, or objects, render nothing. The `attribute` and
    /// `compact_attribute` templates are used when registered, with the
    /// canonical `key="value"` form as the fallback.
    pub fn format(&self, templates: &StringTemplate, attrs: &AttrMap, exclude: &[&str]) -> String {
        let mut rendered: Vec<String> = Vec::new();
        for (key, value) in attrs {
            if exclude.contains(&key.as_str()) {
                continue;
            }
            if let Some(one) = self.format_one(templates, key, value) {
                rendered.push(one);
            }
        }
        if rendered.is_empty() {
            String::new()
        } else {
            format!(" {}", rendered.join(" "))
        }
    }

    fn format_one(&self, templates: &StringTemplate, key: &str, value: &Value) -> Option<String> {
        if self.minimized.contains(key) {
            if is_truthy(key, value) {
                return Some(self.apply(templates, "compact_attribute", key, key));
            }
            return None;
        }
        let text = match value {
            Value::Null | Value::Bool(false) | Value::Object(_) => return None,
            Value::Bool(true) => "1".to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(" "),
        };
        Some(self.apply(templates, "attribute", key, &text))
    }

    fn apply(&self, templates: &StringTemplate, template: &str, key: &str, value: &str) -> String {
        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), key.to_string());
        vars.insert("value".to_string(), escape::html(value));
        templates
            .format(template, &vars)
            .unwrap_or_else(|_| format!("{}=\"{}\"", key, escape::html(value)))
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        _ => String::new(),
    }
}

fn is_truthy(key: &str, value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && (s != "0" || s == key),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn templates() -> StringTemplate {
        StringTemplate::with([
            ("attribute", "{{name}}=\"{{value}}\""),
            ("compact_attribute", "{{name}}=\"{{value}}\""),
        ])
    }

    fn attrs(pairs: &[(&str, Value)]) -> AttrMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn preserves_insertion_order() {
        let f = AttributeFormatter::new();
        let out = f.format(
            &templates(),
            &attrs(&[("id", json!("a")), ("class", json!("b"))]),
            &[],
        );
        assert_eq!(out, " id=\"a\" class=\"b\"");
    }

    #[test]
    fn minimized_truthy_renders_compact() {
        let f = AttributeFormatter::new();
        let out = f.format(&templates(), &attrs(&[("disabled", json!(true))]), &[]);
        assert_eq!(out, " disabled=\"disabled\"");
    }

    #[test]
    fn minimized_falsy_renders_nothing() {
        let f = AttributeFormatter::new();
        let out = f.format(&templates(), &attrs(&[("checked", json!(false))]), &[]);
        assert_eq!(out, "");
    }

    #[test]
    fn null_and_excluded_are_skipped() {
        let f = AttributeFormatter::new();
        let out = f.format(
            &templates(),
            &attrs(&[("title", Value::Null), ("name", json!("x"))]),
            &["name"],
        );
        assert_eq!(out, "");
    }

    #[test]
    fn arrays_join_with_space() {
        let f = AttributeFormatter::new();
        let out = f.format(
            &templates(),
            &attrs(&[("class", json!(["a", "b"]))]),
            &[],
        );
        assert_eq!(out, " class=\"a b\"");
    }

    #[test]
    fn values_are_escaped() {
        let f = AttributeFormatter::new();
        let out = f.format(&templates(), &attrs(&[("title", json!("a\"b"))]), &[]);
        assert_eq!(out, " title=\"a&quot;b\"");
    }

    #[test]
    fn custom_minimized_set() {
        let f = AttributeFormatter::with_minimized(["blinking"]);
        let out = f.format(
            &templates(),
            &attrs(&[("blinking", json!(true)), ("disabled", json!(true))]),
            &[],
        );
        assert_eq!(out, " blinking=\"blinking\" disabled=\"1\"");
    }
}

#![forbid(unsafe_code)]

//! Helper registry and entity/field resolution.
//!
//! Helpers are named render-lifecycle listeners constructed lazily from an
//! explicit factory map: the finite set of loadable helpers is declared up
//! front, and a helper is built the first time it is fetched. The
//! collection also carries the entity-path contract helpers use to pull
//! values out of loose view data and to derive DOM names and labels from
//! dotted field paths.

use crate::events::ViewListener;
use crate::inflect;
use indexmap::IndexMap;
use serde_json::Value;

/// A named render-lifecycle listener.
pub trait Helper: ViewListener {
    fn name(&self) -> &str;
}

type HelperFactory = Box<dyn Fn() -> Box<dyn Helper> + Send + Sync>;

/// Lazily-constructed helper registry.
#[derive(Default)]
pub struct HelperCollection {
    factories: IndexMap<String, HelperFactory>,
    built: IndexMap<String, Box<dyn Helper>>,
}

impl HelperCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a loadable helper. Replaces any factory under the same
    /// name; an already-built instance under that name is dropped.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Helper> + Send + Sync + 'static,
    {
        let name = name.into();
        self.built.shift_remove(&name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Fetch a helper, constructing it on first access. `None` when the
    /// name was never declared.
    pub fn get(&mut self, name: &str) -> Option<&mut Box<dyn Helper>> {
        if !self.built.contains_key(name) {
            let factory = self.factories.get(name)?;
            self.built.insert(name.to_string(), factory());
        }
        self.built.get_mut(name)
    }

    /// Names declared, in registration order.
    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Names already constructed.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.built.keys().map(String::as_str)
    }

    /// Construct every declared helper. Used before a render pass so all
    /// helpers observe its lifecycle events.
    pub fn build_all(&mut self) {
        let names: Vec<String> = self.factories.keys().cloned().collect();
        for name in names {
            let _ = self.get(&name);
        }
    }

    /// Iterate constructed helpers mutably, in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Helper>> {
        self.built.values_mut()
    }
}

/// A parsed dotted field path (`"Article.0.title"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath {
    parts: Vec<String>,
}

impl EntityPath {
    /// Split a dotted path into its segments. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self {
            parts: path
                .split('.')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The leading model segment, when the path starts with a non-numeric
    /// segment and has more than one part.
    pub fn model(&self) -> Option<&str> {
        match self.parts.first() {
            Some(first) if self.parts.len() > 1 && !is_index(first) => Some(first),
            _ => None,
        }
    }

    /// The trailing field segment.
    pub fn field(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Walk a loose value along the path: object segments index by key,
    /// numeric segments index arrays.
    pub fn extract<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for part in &self.parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Bracketed DOM field name: `Article.0.title` -> `Article[0][title]`.
    pub fn dom_name(&self) -> String {
        let mut parts = self.parts.iter();
        let mut out = match parts.next() {
            Some(first) => first.clone(),
            None => return String::new(),
        };
        for part in parts {
            out.push('[');
            out.push_str(part);
            out.push(']');
        }
        out
    }

    /// Human-readable label for the trailing field segment.
    pub fn label(&self) -> String {
        match self.field() {
            Some(field) => inflect::humanize(&inflect::underscore(field)),
            None => String::new(),
        }
    }
}

fn is_index(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    struct Upper;
    impl ViewListener for Upper {
        fn after_render_file(&mut self, _path: &Path, content: String) -> String {
            content.to_uppercase()
        }
    }
    impl Helper for Upper {
        fn name(&self) -> &str {
            "Upper"
        }
    }

    #[test]
    fn helpers_construct_lazily_and_once() {
        let mut helpers = HelperCollection::new();
        helpers.register("Upper", || Box::new(Upper));
        assert_eq!(helpers.loaded().count(), 0);
        assert!(helpers.get("Upper").is_some());
        assert_eq!(helpers.loaded().count(), 1);
        assert!(helpers.get("Missing").is_none());
    }

    #[test]
    fn entity_path_parses_model_and_field() {
        let path = EntityPath::parse("Article.0.title");
        assert_eq!(path.model(), Some("Article"));
        assert_eq!(path.field(), Some("title"));
        assert_eq!(path.dom_name(), "Article[0][title]");
        assert_eq!(path.label(), "Title");
    }

    #[test]
    fn bare_field_has_no_model() {
        let path = EntityPath::parse("title");
        assert_eq!(path.model(), None);
        assert_eq!(path.dom_name(), "title");
    }

    #[test]
    fn extract_walks_objects_and_arrays() {
        let data = json!({"Article": [{"title": "First"}, {"title": "Second"}]});
        let path = EntityPath::parse("Article.1.title");
        assert_eq!(path.extract(&data), Some(&json!("Second")));
        assert_eq!(EntityPath::parse("Article.9.title").extract(&data), None);
    }
}

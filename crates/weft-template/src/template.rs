#![forbid(unsafe_code)]

//! Named `{{placeholder}}` templates.
//!
//! A [`StringTemplate`] holds a set of named template strings, compiled once
//! on registration into literal/placeholder parts. Formatting substitutes
//! placeholders from a caller-supplied ordered variable map.
//!
//! # Syntax
//! - `{{name}}` - substituted from the variable map; unknown names render
//!   as the empty string, never an error.
//! - Anything else, including a `{{` without a closing `}}`, is literal.
//!
//! # Example
//! ```
//! use weft_template::{StringTemplate, TemplateVars};
//!
//! let mut templates = StringTemplate::new();
//! templates.add([("link", "<a href=\"{{url}}\">{{text}}</a>")]);
//!
//! let mut vars = TemplateVars::new();
//! vars.insert("url".into(), "/posts".into());
//! vars.insert("text".into(), "Posts".into());
//! assert_eq!(templates.format("link", &vars).unwrap(), "<a href=\"/posts\">Posts</a>");
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Ordered variable map consumed by [`StringTemplate::format`].
pub type TemplateVars = IndexMap<String, String>;

/// Errors raised by template lookup or bulk loading.
#[derive(Debug)]
pub enum TemplateError {
    /// `format` was called with a template name that was never registered.
    MissingTemplate { name: String },
    /// A bulk-load file could not be read.
    Io { path: String, source: std::io::Error },
    /// A bulk-load file was not a JSON object of strings.
    InvalidDefinitions { path: String, detail: String },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTemplate { name } => {
                write!(f, "cannot find template named '{name}'")
            }
            Self::Io { path, source } => {
                write!(f, "cannot read template definitions '{path}': {source}")
            }
            Self::InvalidDefinitions { path, detail } => {
                write!(f, "invalid template definitions '{path}': {detail}")
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One compiled segment of a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// A template compiled into parts, retaining its source text.
#[derive(Debug, Clone)]
struct Compiled {
    source: String,
    parts: Vec<Part>,
}

fn compile(source: &str) -> Compiled {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = source;
    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    parts.push(Part::Literal(std::mem::take(&mut literal)));
                }
                parts.push(Part::Placeholder(after[..close].trim().to_string()));
                rest = &after[close + 2..];
            }
            None => {
                // No closing brace: the remainder is literal.
                literal.push_str(&rest[..open + 2]);
                rest = after;
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Compiled {
        source: source.to_string(),
        parts,
    }
}

/// Named template registry with save/restore stacking.
#[derive(Debug, Clone, Default)]
pub struct StringTemplate {
    templates: HashMap<String, Compiled>,
    stack: Vec<HashMap<String, Compiled>>,
}

impl StringTemplate {
    /// Create an empty template set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a template set pre-populated from `(name, template)` pairs.
    pub fn with<I, K, V>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        set.add(definitions);
        set
    }

    /// Merge template definitions in, replacing any existing entries.
    pub fn add<I, K, V>(&mut self, definitions: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        for (name, source) in definitions {
            self.templates.insert(name.into(), compile(source.as_ref()));
        }
    }

    /// Remove a named template. Removing an unknown name is a no-op.
    pub fn remove(&mut self, name: &str) {
        self.templates.remove(name);
    }

    /// The source text of a named template, if registered.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(|c| c.source.as_str())
    }

    /// Save the current template set so a later [`pop`](Self::pop) can
    /// restore it. Used for temporary overrides around one rendering task.
    pub fn push(&mut self) {
        self.stack.push(self.templates.clone());
    }

    /// Restore the template set saved by the matching [`push`](Self::push).
    /// No-op when nothing was pushed.
    pub fn pop(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.templates = saved;
        }
    }

    /// Load template definitions from a JSON object file
    /// (`{"name": "template", ...}`) and merge them in.
    pub fn load(&mut self, path: &Path) -> Result<(), TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: serde_json::Value =
            serde_json::from_str(&text).map_err(|err| TemplateError::InvalidDefinitions {
                path: path.display().to_string(),
                detail: err.to_string(),
            })?;
        let object = parsed
            .as_object()
            .ok_or_else(|| TemplateError::InvalidDefinitions {
                path: path.display().to_string(),
                detail: "top level value must be an object".to_string(),
            })?;
        for (name, value) in object {
            let source = value
                .as_str()
                .ok_or_else(|| TemplateError::InvalidDefinitions {
                    path: path.display().to_string(),
                    detail: format!("template '{name}' must be a string"),
                })?;
            self.templates.insert(name.clone(), compile(source));
        }
        Ok(())
    }

    /// Format the named template, substituting placeholders from `vars`.
    ///
    /// Unknown placeholders render as the empty string. An unknown template
    /// *name* is an error.
    pub fn format(&self, name: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
        let compiled = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::MissingTemplate {
                name: name.to_string(),
            })?;
        let mut out = String::new();
        for part in &compiled.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(key) => {
                    if let Some(value) = vars.get(key.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_placeholders() {
        let t = StringTemplate::with([("greeting", "hello {{name}}!")]);
        assert_eq!(
            t.format("greeting", &vars(&[("name", "world")])).unwrap(),
            "hello world!"
        );
    }

    #[test]
    fn unknown_placeholder_renders_empty() {
        let t = StringTemplate::with([("x", "a{{missing}}b")]);
        assert_eq!(t.format("x", &vars(&[])).unwrap(), "ab");
    }

    #[test]
    fn unknown_template_name_errors() {
        let t = StringTemplate::new();
        let err = t.format("nope", &vars(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::MissingTemplate { .. }));
    }

    #[test]
    fn unclosed_braces_are_literal() {
        let t = StringTemplate::with([("x", "a{{b")]);
        assert_eq!(t.format("x", &vars(&[])).unwrap(), "a{{b");
    }

    #[test]
    fn placeholder_names_are_trimmed() {
        let t = StringTemplate::with([("x", "{{ name }}")]);
        assert_eq!(t.format("x", &vars(&[("name", "v")])).unwrap(), "v");
    }

    #[test]
    fn push_pop_restores_overrides() {
        let mut t = StringTemplate::with([("x", "original")]);
        t.push();
        t.add([("x", "override")]);
        assert_eq!(t.format("x", &vars(&[])).unwrap(), "override");
        t.pop();
        assert_eq!(t.format("x", &vars(&[])).unwrap(), "original");
    }

    #[test]
    fn remove_then_format_errors() {
        let mut t = StringTemplate::with([("x", "y")]);
        t.remove("x");
        assert!(t.format("x", &TemplateVars::new()).is_err());
    }
}

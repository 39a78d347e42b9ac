#![forbid(unsafe_code)]

//! Template evaluation boundary.
//!
//! The view orchestrates *which* files render in *what* order; how a file
//! path becomes output is the engine's concern. An engine receives the
//! resolved path and a [`Scope`] giving it the view's variables, output
//! channel, block operations, `extend`, and `element`: everything
//! template code may touch.
//!
//! [`ClosureEngine`] is the shipped implementation: templates are Rust
//! closures (or literal text with `{{var}}` substitution) registered
//! against paths, with no filesystem involved.

use crate::RenderError;
use crate::view::Scope;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use weft_template::{StringTemplate, TemplateVars};

/// Evaluates one resolved template file against a view scope.
pub trait TemplateEngine {
    /// Evaluate the file at `path`, writing output through the scope.
    fn render(&self, path: &Path, scope: &mut Scope<'_>) -> Result<(), RenderError>;

    /// Whether a candidate path is renderable. The path cascade asks this
    /// during resolution, so engines define their own notion of existence.
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

type RenderFn = Box<dyn Fn(&mut Scope<'_>) -> Result<(), RenderError> + Send + Sync>;

/// In-memory engine mapping paths to render closures.
#[derive(Default)]
pub struct ClosureEngine {
    templates: HashMap<PathBuf, RenderFn>,
}

impl ClosureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure as the template for `path`.
    pub fn register<F>(&mut self, path: impl Into<PathBuf>, template: F)
    where
        F: Fn(&mut Scope<'_>) -> Result<(), RenderError> + Send + Sync + 'static,
    {
        self.templates.insert(path.into(), Box::new(template));
    }

    /// Register literal text for `path`; `{{name}}` placeholders are
    /// substituted from the scope's variables at render time.
    pub fn register_text(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let text = text.into();
        self.register(path, move |scope| {
            let templates = StringTemplate::with([("text", text.as_str())]);
            let mut vars = TemplateVars::new();
            for (name, value) in scope.vars() {
                vars.insert(name.to_string(), var_text(value));
            }
            let out = templates.format("text", &vars)?;
            scope.write(&out);
            Ok(())
        });
    }
}

impl TemplateEngine for ClosureEngine {
    fn render(&self, path: &Path, scope: &mut Scope<'_>) -> Result<(), RenderError> {
        match self.templates.get(path) {
            Some(template) => template(scope),
            None => Err(RenderError::Engine {
                path: path.to_path_buf(),
                detail: "no template registered for path".to_string(),
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.templates.contains_key(path)
    }
}

fn var_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

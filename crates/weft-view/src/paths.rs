#![forbid(unsafe_code)]

//! Template root cascade and file resolution.
//!
//! Roots are searched in precedence order: plugin roots first (only when a
//! plugin was requested), then for each app root its themed variant
//! (`root/themed/<theme>/`) immediately before the plain root, then core
//! roots last. This single ordering gives both "theme over app over core"
//! and "plugin over app over core" without enumerating combinations;
//! plugin roots are unaffected by the theme.
//!
//! Existence is asked of the template engine, not the filesystem directly,
//! so in-memory engines resolve through the same cascade.

use crate::engine::TemplateEngine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Canonical template file extension, tried after any configured one.
pub const DEFAULT_EXTENSION: &str = ".tpl";

/// Subdirectory holding element templates, under each root.
pub const ELEMENT_DIR: &str = "element";

/// Subdirectory holding layout templates, under each root.
pub const LAYOUT_DIR: &str = "layout";

/// Subdirectory holding themed overrides, under each app root.
pub const THEME_DIR: &str = "themed";

/// Template root configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewPaths {
    /// Application template roots, highest precedence after plugins.
    pub app: Vec<PathBuf>,
    /// Framework fallback roots, searched last.
    pub core: Vec<PathBuf>,
    /// Per-plugin template roots.
    pub plugins: HashMap<String, Vec<PathBuf>>,
    /// Active theme; inserts `themed/<name>/` variants before app roots.
    pub theme: Option<String>,
}

/// Memoizing root-list builder and file finder over [`ViewPaths`].
#[derive(Debug, Default)]
pub struct PathResolver {
    paths: ViewPaths,
    extension: Option<String>,
    memo: HashMap<String, Vec<PathBuf>>,
}

impl PathResolver {
    pub fn new(paths: ViewPaths) -> Self {
        Self {
            paths,
            extension: None,
            memo: HashMap::new(),
        }
    }

    /// Configure an extension tried before [`DEFAULT_EXTENSION`] (builder).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Ordered root list for one plugin scope, memoized.
    pub fn roots(&mut self, plugin: Option<&str>) -> &[PathBuf] {
        let key = plugin.unwrap_or("").to_string();
        if !self.memo.contains_key(&key) {
            let mut roots = Vec::new();
            if let Some(plugin) = plugin
                && let Some(plugin_roots) = self.paths.plugins.get(plugin)
            {
                roots.extend(plugin_roots.iter().cloned());
            }
            for app in &self.paths.app {
                if let Some(theme) = &self.paths.theme {
                    roots.push(app.join(THEME_DIR).join(theme));
                }
                roots.push(app.clone());
            }
            roots.extend(self.paths.core.iter().cloned());
            self.memo.insert(key.clone(), roots);
        }
        &self.memo[&key]
    }

    /// Find the first existing candidate for `name` under `sub_dir` in the
    /// given plugin scope. Returns the match, or the first candidate tried
    /// (for error reporting) when nothing exists.
    pub fn find(
        &mut self,
        engine: &dyn TemplateEngine,
        plugin: Option<&str>,
        sub_dir: &str,
        name: &str,
    ) -> Result<PathBuf, PathBuf> {
        let extensions = self.extensions();
        let mut first: Option<PathBuf> = None;
        for root in self.roots(plugin) {
            let base = if sub_dir.is_empty() {
                root.join(name)
            } else {
                root.join(sub_dir).join(name)
            };
            for ext in &extensions {
                let candidate = with_extension(&base, ext);
                if engine.exists(&candidate) {
                    return Ok(candidate);
                }
                first.get_or_insert(candidate);
            }
        }
        Err(first.unwrap_or_else(|| PathBuf::from(name)))
    }

    /// Split `Plugin.name` dot syntax into plugin scope and bare name.
    pub fn split_plugin(name: &str) -> (Option<&str>, &str) {
        match name.split_once('.') {
            Some((plugin, rest)) if !plugin.is_empty() && !rest.is_empty() => {
                (Some(plugin), rest)
            }
            _ => (None, name),
        }
    }

    fn extensions(&self) -> Vec<String> {
        match &self.extension {
            Some(custom) if custom != DEFAULT_EXTENSION => {
                vec![custom.clone(), DEFAULT_EXTENSION.to_string()]
            }
            _ => vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}

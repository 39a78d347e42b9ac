#![forbid(unsafe_code)]

//! The render orchestrator.
//!
//! A [`View`] runs one render pass: resolve the view file through the
//! path cascade, evaluate it, walk any `extend` parent chain bottom-up,
//! commit the result to the `content` block, then wrap it in a layout.
//! What kind of file is being rendered is threaded through the recursion
//! as a [`RenderKind`] parameter, never mutated state, so nested element
//! renders cannot corrupt the outer pass.
//!
//! Template code sees the view through a [`Scope`]: variables, an output
//! channel, block operations, `extend`, and `element`. Raw writes go to
//! the innermost block capture opened within the current file, else to
//! the file's own output frame; a capture left open when its file ends is
//! a fatal, named error.

use crate::RenderError;
use crate::block::ViewBlock;
use crate::cache::ElementCache;
use crate::engine::{ClosureEngine, TemplateEngine};
use crate::events::ViewListener;
use crate::helpers::HelperCollection;
use crate::inflect;
use crate::paths::{ELEMENT_DIR, LAYOUT_DIR, PathResolver, ViewPaths};
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What kind of file a recursion level is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    View,
    Element,
    Layout,
}

/// Options for one `element` call.
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    /// Fire `before_render`/`after_render` for the element. Off by
    /// default: elements render at high frequency and the whole-pass
    /// events have different semantics.
    pub callbacks: bool,
    /// Cache the element's output under the named store configuration.
    pub cache: Option<ElementCacheOptions>,
}

/// Cache parameters for one `element` call.
#[derive(Debug, Clone)]
pub struct ElementCacheOptions {
    /// Store configuration name, part of the generated key.
    pub config: String,
    /// Explicit key; when absent one is derived from plugin, element
    /// name, and sorted data keys.
    pub key: Option<String>,
}

impl ElementCacheOptions {
    pub fn config(config: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Per-file output buffer; `captures_at_entry` is the number of block
/// captures open when the file started, the pivot for write routing and
/// the unclosed-block check.
#[derive(Debug, Default)]
struct OutputFrame {
    out: String,
    captures_at_entry: usize,
}

/// Configures and constructs a [`View`].
pub struct ViewBuilder {
    paths: ViewPaths,
    engine: Option<Arc<dyn TemplateEngine>>,
    template: String,
    layout: String,
    auto_layout: bool,
    plugin: Option<String>,
    sub_dir: String,
    layout_path: String,
    extension: Option<String>,
    vars: IndexMap<String, Value>,
    helpers: HelperCollection,
    listeners: Vec<Box<dyn ViewListener>>,
    cache: Option<Arc<dyn ElementCache>>,
    debug: bool,
}

impl Default for ViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewBuilder {
    pub fn new() -> Self {
        Self {
            paths: ViewPaths::default(),
            engine: None,
            template: String::new(),
            layout: "default".to_string(),
            auto_layout: true,
            plugin: None,
            sub_dir: String::new(),
            layout_path: String::new(),
            extension: None,
            vars: IndexMap::new(),
            helpers: HelperCollection::new(),
            listeners: Vec::new(),
            cache: None,
            debug: false,
        }
    }

    /// Template roots searched by the cascade.
    pub fn with_paths(mut self, paths: ViewPaths) -> Self {
        self.paths = paths;
        self
    }

    /// The engine evaluating resolved files.
    pub fn with_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Name of the view template to render.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Layout name; empty disables the layout pass.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Whether the layout pass runs at all.
    pub fn with_auto_layout(mut self, auto_layout: bool) -> Self {
        self.auto_layout = auto_layout;
        self
    }

    /// Default plugin scope for unqualified names.
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Subdirectory under each root for view files.
    pub fn with_sub_dir(mut self, sub_dir: impl Into<String>) -> Self {
        self.sub_dir = sub_dir.into();
        self
    }

    /// Subdirectory under `layout/` for layout files.
    pub fn with_layout_path(mut self, layout_path: impl Into<String>) -> Self {
        self.layout_path = layout_path.into();
        self
    }

    /// File extension tried before the canonical `.tpl`.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Set one view variable.
    pub fn set(mut self, name: impl Into<String>, value: Value) -> Self {
        self.vars.insert(name.into(), value);
        self
    }

    /// Attach a lifecycle listener.
    pub fn with_listener(mut self, listener: Box<dyn ViewListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Attach the helper registry.
    pub fn with_helpers(mut self, helpers: HelperCollection) -> Self {
        self.helpers = helpers;
        self
    }

    /// Attach the element content cache store.
    pub fn with_cache(mut self, cache: Arc<dyn ElementCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Debug rendering: missing elements render an inline marker instead
    /// of empty output.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn build(self) -> View {
        let mut resolver = PathResolver::new(self.paths);
        if let Some(extension) = self.extension {
            resolver = resolver.with_extension(extension);
        }
        View {
            resolver,
            engine: self
                .engine
                .unwrap_or_else(|| Arc::new(ClosureEngine::new())),
            template: self.template,
            layout: self.layout,
            auto_layout: self.auto_layout,
            plugin: self.plugin,
            sub_dir: self.sub_dir,
            layout_path: self.layout_path,
            vars: self.vars,
            helpers: self.helpers,
            listeners: self.listeners,
            cache: self.cache,
            debug: self.debug,
            blocks: ViewBlock::new(),
            parents: HashMap::new(),
            content_stack: Vec::new(),
            frames: Vec::new(),
            render_stack: Vec::new(),
            rendered: None,
        }
    }
}

/// One render pass over one view template.
pub struct View {
    resolver: PathResolver,
    engine: Arc<dyn TemplateEngine>,
    template: String,
    layout: String,
    auto_layout: bool,
    plugin: Option<String>,
    sub_dir: String,
    layout_path: String,
    vars: IndexMap<String, Value>,
    helpers: HelperCollection,
    listeners: Vec<Box<dyn ViewListener>>,
    cache: Option<Arc<dyn ElementCache>>,
    debug: bool,
    blocks: ViewBlock,
    parents: HashMap<PathBuf, PathBuf>,
    content_stack: Vec<String>,
    frames: Vec<OutputFrame>,
    render_stack: Vec<(PathBuf, RenderKind)>,
    rendered: Option<String>,
}

impl View {
    pub fn builder() -> ViewBuilder {
        ViewBuilder::new()
    }

    /// Run the render pass and return the final content. A second call
    /// returns the already-rendered content without re-evaluating.
    pub fn render(&mut self) -> Result<String, RenderError> {
        if let Some(content) = &self.rendered {
            return Ok(content.clone());
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("view_render", template = %self.template).entered();

        self.helpers.build_all();
        let name = self.template.clone();
        let path = self.resolve_view(&name)?;
        self.dispatch_before_render(&path);
        let content = self.render_file(&path, RenderKind::View)?;
        self.blocks.set("content", content);
        self.dispatch_after_render(&path);

        let mut content = self.blocks.get("content").to_string();
        if self.auto_layout && !self.layout.is_empty() {
            let layout = self.layout.clone();
            content = self.render_layout(&layout)?;
        }
        self.rendered = Some(content.clone());
        Ok(content)
    }

    /// Render a named element with its own variable scope. Missing
    /// elements render an inline marker in debug mode and empty output
    /// otherwise; a cache hit skips resolution and events entirely.
    pub fn element(
        &mut self,
        name: &str,
        data: &IndexMap<String, Value>,
        options: &ElementOptions,
    ) -> Result<String, RenderError> {
        let cache_key = options
            .cache
            .as_ref()
            .map(|opts| self.element_cache_key(name, data, opts));
        if let (Some(key), Some(store)) = (&cache_key, &self.cache)
            && let Some(hit) = store.read(key)
        {
            return Ok(hit);
        }

        let path = match self.resolve_element(name) {
            Ok(path) => path,
            Err(_) => {
                return Ok(if self.debug {
                    format!("Element Not Found: {name}")
                } else {
                    String::new()
                });
            }
        };

        let saved = self.vars.clone();
        for (key, value) in data {
            self.vars.insert(key.clone(), value.clone());
        }
        if options.callbacks {
            self.dispatch_before_render(&path);
        }
        let result = self.render_file(&path, RenderKind::Element);
        if options.callbacks && result.is_ok() {
            self.dispatch_after_render(&path);
        }
        self.vars = saved;
        let content = result?;

        if let (Some(key), Some(store)) = (&cache_key, &self.cache) {
            store.write(key, &content);
        }
        Ok(content)
    }

    /// Stored block content.
    pub fn fetch(&self, name: &str) -> &str {
        self.blocks.get(name)
    }

    /// Overwrite a block directly.
    pub fn assign(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.blocks.set(name, text);
    }

    /// The block store.
    pub fn blocks(&self) -> &ViewBlock {
        &self.blocks
    }

    /// One view variable.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Set a view variable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// The helper registry.
    pub fn helpers_mut(&mut self) -> &mut HelperCollection {
        &mut self.helpers
    }

    fn render_file(&mut self, path: &Path, kind: RenderKind) -> Result<String, RenderError> {
        let entry_blocks: Vec<String> = self
            .blocks
            .unclosed()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.dispatch_before_render_file(path);
        let content = self.evaluate(path, kind)?;
        let mut content = self.dispatch_after_render_file(path, content);

        if let Some(parent) = self.parents.get(path).cloned() {
            self.content_stack.push(self.blocks.get("content").to_string());
            self.blocks.set("content", content);
            content = self.render_file(&parent, kind)?;
            if let Some(previous) = self.content_stack.pop() {
                self.blocks.set("content", previous);
            }
        }

        let open_blocks = self.blocks.unclosed();
        if open_blocks.len() != entry_blocks.len() {
            // Opened without closing names the innermost leftover capture;
            // closing a capture opened by an outer file names that capture.
            let block = if open_blocks.len() > entry_blocks.len() {
                open_blocks.last().map(|s| s.to_string()).unwrap_or_default()
            } else {
                entry_blocks
                    .get(open_blocks.len())
                    .cloned()
                    .unwrap_or_default()
            };
            return Err(RenderError::UnclosedBlock { block });
        }
        Ok(content)
    }

    fn evaluate(&mut self, path: &Path, kind: RenderKind) -> Result<String, RenderError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("render_file", path = %path.display()).entered();

        self.frames.push(OutputFrame {
            out: String::new(),
            captures_at_entry: self.blocks.open_captures(),
        });
        self.render_stack.push((path.to_path_buf(), kind));
        let engine = Arc::clone(&self.engine);
        let result = engine.render(path, &mut Scope { view: self });
        self.render_stack.pop();
        let frame = self.frames.pop().unwrap_or_default();
        result?;
        Ok(frame.out)
    }

    fn render_layout(&mut self, name: &str) -> Result<String, RenderError> {
        let path = self.resolve_layout(name)?;

        let scripts = format!(
            "{}{}{}",
            self.blocks.get("meta"),
            self.blocks.get("css"),
            self.blocks.get("script"),
        );
        self.vars
            .insert("scripts_for_layout".to_string(), json!(scripts));
        let title = if self.blocks.get("title").is_empty() {
            let base = self
                .template
                .rsplit('/')
                .next()
                .unwrap_or(self.template.as_str());
            inflect::humanize(&inflect::underscore(base))
        } else {
            self.blocks.get("title").to_string()
        };
        self.blocks.set("title", title.clone());
        self.vars.insert("title_for_layout".to_string(), json!(title));

        self.dispatch_before_layout(&path);
        let content = self.render_file(&path, RenderKind::Layout)?;
        self.blocks.set("content", content.clone());
        self.dispatch_after_layout(&path);
        Ok(content)
    }

    fn resolve_view(&mut self, name: &str) -> Result<PathBuf, RenderError> {
        let (explicit, bare) = PathResolver::split_plugin(name);
        let plugin = explicit
            .map(str::to_string)
            .or_else(|| self.plugin.clone());
        let sub_dir = self.sub_dir.clone();
        let engine = Arc::clone(&self.engine);
        match self
            .resolver
            .find(engine.as_ref(), plugin.as_deref(), &sub_dir, bare)
        {
            Ok(path) => Ok(path),
            Err(first) => {
                // Plugin lookup falls back to the unqualified app-level name.
                if plugin.is_some()
                    && let Ok(path) = self.resolver.find(engine.as_ref(), None, &sub_dir, bare)
                {
                    return Ok(path);
                }
                Err(RenderError::MissingView {
                    name: name.to_string(),
                    path: first,
                })
            }
        }
    }

    fn resolve_element(&mut self, name: &str) -> Result<PathBuf, PathBuf> {
        let (explicit, bare) = PathResolver::split_plugin(name);
        let plugin = explicit
            .map(str::to_string)
            .or_else(|| self.plugin.clone());
        let engine = Arc::clone(&self.engine);
        self.resolver
            .find(engine.as_ref(), plugin.as_deref(), ELEMENT_DIR, bare)
    }

    fn resolve_layout(&mut self, name: &str) -> Result<PathBuf, RenderError> {
        let (explicit, bare) = PathResolver::split_plugin(name);
        let plugin = explicit
            .map(str::to_string)
            .or_else(|| self.plugin.clone());
        let sub_dir = if self.layout_path.is_empty() {
            LAYOUT_DIR.to_string()
        } else {
            format!("{LAYOUT_DIR}/{}", self.layout_path)
        };
        let engine = Arc::clone(&self.engine);
        match self
            .resolver
            .find(engine.as_ref(), plugin.as_deref(), &sub_dir, bare)
        {
            Ok(path) => Ok(path),
            Err(first) => {
                if plugin.is_some()
                    && let Ok(path) = self.resolver.find(engine.as_ref(), None, &sub_dir, bare)
                {
                    return Ok(path);
                }
                Err(RenderError::MissingLayout {
                    name: name.to_string(),
                    path: first,
                })
            }
        }
    }

    fn element_cache_key(
        &self,
        name: &str,
        data: &IndexMap<String, Value>,
        opts: &ElementCacheOptions,
    ) -> String {
        if let Some(key) = &opts.key {
            return format!("element_{}_{key}", opts.config);
        }
        let (explicit, bare) = PathResolver::split_plugin(name);
        let plugin = explicit
            .map(str::to_string)
            .or_else(|| self.plugin.clone())
            .unwrap_or_default();
        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        format!(
            "element_{}_{}_{}_{}",
            opts.config,
            plugin,
            bare.replace('/', "_"),
            keys.join("_"),
        )
    }

    fn dispatch_before_render(&mut self, path: &Path) {
        for listener in &mut self.listeners {
            listener.before_render(path);
        }
        for helper in self.helpers.iter_mut() {
            helper.before_render(path);
        }
    }

    fn dispatch_after_render(&mut self, path: &Path) {
        for listener in &mut self.listeners {
            listener.after_render(path);
        }
        for helper in self.helpers.iter_mut() {
            helper.after_render(path);
        }
    }

    fn dispatch_before_render_file(&mut self, path: &Path) {
        for listener in &mut self.listeners {
            listener.before_render_file(path);
        }
        for helper in self.helpers.iter_mut() {
            helper.before_render_file(path);
        }
    }

    fn dispatch_after_render_file(&mut self, path: &Path, mut content: String) -> String {
        for listener in &mut self.listeners {
            content = listener.after_render_file(path, content);
        }
        for helper in self.helpers.iter_mut() {
            content = helper.after_render_file(path, content);
        }
        content
    }

    fn dispatch_before_layout(&mut self, path: &Path) {
        for listener in &mut self.listeners {
            listener.before_layout(path);
        }
        for helper in self.helpers.iter_mut() {
            helper.before_layout(path);
        }
    }

    fn dispatch_after_layout(&mut self, path: &Path) {
        for listener in &mut self.listeners {
            listener.after_layout(path);
        }
        for helper in self.helpers.iter_mut() {
            helper.after_layout(path);
        }
    }
}

/// What template code sees while a file evaluates.
pub struct Scope<'a> {
    pub(crate) view: &'a mut View,
}

impl Scope<'_> {
    /// One view variable.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.view.vars.get(name)
    }

    /// All view variables, in insertion order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.view.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a view variable visible to subsequently rendered files.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.view.vars.insert(name.into(), value);
    }

    /// Write raw output: into the innermost block capture opened within
    /// the current file, else into the file's output.
    pub fn write(&mut self, text: &str) {
        let at_entry = self
            .view
            .frames
            .last()
            .map(|f| f.captures_at_entry)
            .unwrap_or(0);
        if self.view.blocks.open_captures() > at_entry {
            self.view.blocks.write(text);
        } else if let Some(frame) = self.view.frames.last_mut() {
            frame.out.push_str(text);
        }
    }

    /// Open a block capture.
    pub fn start(&mut self, name: impl Into<String>) {
        self.view.blocks.start(name);
    }

    /// Close the innermost block capture.
    pub fn end(&mut self) {
        self.view.blocks.end();
    }

    /// Append directly onto a block.
    pub fn append(&mut self, name: impl Into<String>, text: &str) {
        self.view.blocks.append(name, text);
    }

    /// Overwrite a block.
    pub fn assign(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.view.blocks.set(name, text);
    }

    /// Stored block content (`""` when never committed).
    pub fn fetch(&self, name: &str) -> &str {
        self.view.blocks.get(name)
    }

    /// Names of all committed blocks.
    pub fn blocks(&self) -> Vec<String> {
        self.view.blocks.keys().map(str::to_string).collect()
    }

    /// The kind of file currently rendering.
    pub fn kind(&self) -> RenderKind {
        self.view
            .render_stack
            .last()
            .map(|(_, kind)| *kind)
            .unwrap_or(RenderKind::View)
    }

    /// Declare the current file's parent template. The name resolves
    /// relative to the current render kind: views extend view files,
    /// elements extend element files (no view fallback), layouts extend
    /// layout files; a leading `/` always resolves as a view file. A file
    /// extending itself, or closing a cycle through already-declared
    /// parents, is fatal.
    pub fn extend(&mut self, name: &str) -> Result<(), RenderError> {
        let Some((current, kind)) = self.view.render_stack.last().cloned() else {
            return Ok(());
        };
        let parent = if let Some(absolute) = name.strip_prefix('/') {
            self.view.resolve_view(absolute)?
        } else {
            match kind {
                RenderKind::View => self.view.resolve_view(name)?,
                RenderKind::Element => self.view.resolve_element(name).map_err(|first| {
                    RenderError::MissingElement {
                        name: name.to_string(),
                        path: first,
                    }
                })?,
                RenderKind::Layout => self.view.resolve_layout(name)?,
            }
        };
        if parent == current {
            return Err(RenderError::SelfExtend { path: parent });
        }
        let mut cursor = self.view.parents.get(&parent);
        while let Some(ancestor) = cursor {
            if *ancestor == current {
                return Err(RenderError::ExtendCycle { path: parent });
            }
            cursor = self.view.parents.get(ancestor);
        }
        self.view.parents.insert(current, parent);
        Ok(())
    }

    /// Render an element within this pass.
    pub fn element(
        &mut self,
        name: &str,
        data: &IndexMap<String, Value>,
        options: &ElementOptions,
    ) -> Result<String, RenderError> {
        self.view.element(name, data, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_view(
        engine: ClosureEngine,
        template: &str,
        layout: &str,
    ) -> View {
        View::builder()
            .with_paths(ViewPaths {
                app: vec![PathBuf::from("/t")],
                ..ViewPaths::default()
            })
            .with_engine(Arc::new(engine))
            .with_template(template)
            .with_layout(layout)
            .build()
    }

    #[test]
    fn writes_outside_captures_go_to_file_output() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            scope.write("before ");
            scope.start("side");
            scope.write("captured");
            scope.end();
            scope.write("after");
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        let out = view.render().unwrap();
        assert_eq!(out, "before after");
        assert_eq!(view.fetch("side"), "captured");
    }

    #[test]
    fn second_render_returns_stored_content() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            scope.write("once");
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        assert_eq!(view.render().unwrap(), "once");
        assert_eq!(view.render().unwrap(), "once");
    }

    #[test]
    fn missing_view_carries_first_searched_path() {
        let engine = ClosureEngine::new();
        let mut view = engine_view(engine, "absent", "");
        match view.render() {
            Err(RenderError::MissingView { name, path }) => {
                assert_eq!(name, "absent");
                assert_eq!(path, PathBuf::from("/t/absent.tpl"));
            }
            other => panic!("expected MissingView, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_capture_is_fatal_and_named() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            scope.start("leak");
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        match view.render() {
            Err(RenderError::UnclosedBlock { block }) => assert_eq!(block, "leak"),
            other => panic!("expected UnclosedBlock, got {other:?}"),
        }
    }

    #[test]
    fn closing_an_outer_capture_names_that_capture() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            scope.start("sidebar");
            let out = scope.element("rogue", &IndexMap::new(), &ElementOptions::default())?;
            scope.write(&out);
            scope.end();
            Ok(())
        });
        engine.register("/t/element/rogue.tpl", |scope| {
            scope.end();
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        match view.render() {
            Err(RenderError::UnclosedBlock { block }) => assert_eq!(block, "sidebar"),
            other => panic!("expected UnclosedBlock, got {other:?}"),
        }
    }

    #[test]
    fn capture_opened_by_parent_file_not_writable_from_child() {
        // A capture opened before the element started belongs to the outer
        // file; the element's writes go to its own output.
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            scope.start("outer");
            let inner = scope.element("part", &IndexMap::new(), &ElementOptions::default())?;
            scope.write(&inner);
            scope.end();
            Ok(())
        });
        engine.register("/t/element/part.tpl", |scope| {
            scope.write("inner");
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        view.render().unwrap();
        assert_eq!(view.fetch("outer"), "inner");
    }

    #[test]
    fn element_not_found_is_soft() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            let out = scope.element("ghost", &IndexMap::new(), &ElementOptions::default())?;
            scope.write(&out);
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        assert_eq!(view.render().unwrap(), "");
    }

    #[test]
    fn element_not_found_renders_marker_in_debug() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            let out = scope.element("ghost", &IndexMap::new(), &ElementOptions::default())?;
            scope.write(&out);
            Ok(())
        });
        let mut view = View::builder()
            .with_paths(ViewPaths {
                app: vec![PathBuf::from("/t")],
                ..ViewPaths::default()
            })
            .with_engine(Arc::new(engine))
            .with_template("page")
            .with_layout("")
            .with_debug(true)
            .build();
        assert_eq!(view.render().unwrap(), "Element Not Found: ghost");
    }

    #[test]
    fn element_data_overlay_is_scoped() {
        let mut engine = ClosureEngine::new();
        engine.register("/t/page.tpl", |scope| {
            let mut data = IndexMap::new();
            data.insert("word".to_string(), json!("local"));
            let out = scope.element("part", &data, &ElementOptions::default())?;
            scope.write(&out);
            let after = scope
                .var("word")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            scope.write(&format!(" then {after}"));
            Ok(())
        });
        engine.register("/t/element/part.tpl", |scope| {
            let word = scope
                .var("word")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            scope.write(&word);
            Ok(())
        });
        let mut view = engine_view(engine, "page", "");
        view.set("word", json!("global"));
        assert_eq!(view.render().unwrap(), "local then global");
    }
}

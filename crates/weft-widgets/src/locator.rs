#![forbid(unsafe_code)]

//! Widget name resolution with dependency injection.
//!
//! The locator maps names to either constructed instances or unresolved
//! `(class, dependency names)` specs. Resolution is a lazy singleton per
//! name: class registrations resolve on first `get`, dependencies resolve recursively
//! from the same registry, and the constructed instance replaces the registration
//! in place. A "currently resolving" set turns cyclic registrations into an
//! immediate configuration error instead of unbounded recursion.
//!
//! Applications override any named widget, including transitively
//! depended-on ones, without touching dependents; that is the point of
//! resolving dependencies by name rather than wiring constructors.

use crate::basic::BasicWidget;
use crate::button::ButtonWidget;
use crate::checkbox::CheckboxWidget;
use crate::datetime::DateTimeWidget;
use crate::file::FileWidget;
use crate::hidden::HiddenWidget;
use crate::label::LabelWidget;
use crate::multi_checkbox::MultiCheckboxWidget;
use crate::radio::RadioWidget;
use crate::select_box::SelectBoxWidget;
use crate::textarea::TextareaWidget;
use crate::year::YearWidget;
use crate::{Widget, default_templates};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate};

/// Dependency name that injects the owning view handle instead of a widget.
pub const VIEW_DEP: &str = "_view";

/// Reserved fallback name tried when an unknown widget is requested.
pub const DEFAULT_NAME: &str = "_default";

/// Opaque handle to the owning view, injected for `_view` dependencies.
pub trait ViewBridge: Any {}

/// Errors raised during widget resolution.
#[derive(Debug)]
pub enum LocatorError {
    /// No spec under the name, and no `_default` registered.
    UnknownWidget { name: String },
    /// A spec names a class with no registered factory.
    UnknownClass { class: String },
    /// A spec depends, directly or transitively, on itself.
    CyclicDependency { name: String },
    /// A spec requested `_view` but the locator holds no view handle.
    ViewUnavailable { name: String },
    /// A factory received fewer dependencies than its class needs.
    InvalidSpec { class: String, detail: String },
    /// A definitions file could not be read.
    Io { path: String, source: std::io::Error },
    /// A definitions file was not the expected JSON shape.
    InvalidDefinitions { path: String, detail: String },
}

impl std::fmt::Display for LocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWidget { name } => {
                write!(f, "unknown widget '{name}' and no '_default' widget registered")
            }
            Self::UnknownClass { class } => {
                write!(f, "unable to locate widget class '{class}'")
            }
            Self::CyclicDependency { name } => {
                write!(f, "widget '{name}' depends on itself, directly or transitively")
            }
            Self::ViewUnavailable { name } => {
                write!(f, "widget '{name}' requires '_view' but no view handle was supplied")
            }
            Self::InvalidSpec { class, detail } => {
                write!(f, "invalid spec for widget class '{class}': {detail}")
            }
            Self::Io { path, source } => {
                write!(f, "cannot read widget definitions '{path}': {source}")
            }
            Self::InvalidDefinitions { path, detail } => {
                write!(f, "invalid widget definitions '{path}': {detail}")
            }
        }
    }
}

impl std::error::Error for LocatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Everything a widget factory may draw on.
pub struct WidgetArgs {
    pub templates: Arc<StringTemplate>,
    pub formatter: AttributeFormatter,
    /// Resolved widget dependencies, in declaration order (minus `_view`).
    pub widgets: Vec<Arc<dyn Widget>>,
    /// The view handle, present when the registration listed `_view`.
    pub view: Option<Arc<dyn ViewBridge>>,
}

impl WidgetArgs {
    /// Take the next widget dependency, erroring when the declaration was short.
    pub fn dependency(
        &mut self,
        class: &str,
        role: &str,
    ) -> Result<Arc<dyn Widget>, LocatorError> {
        if self.widgets.is_empty() {
            return Err(LocatorError::InvalidSpec {
                class: class.to_string(),
                detail: format!("missing '{role}' dependency"),
            });
        }
        Ok(self.widgets.remove(0))
    }
}

/// Constructor for one widget class.
pub type WidgetFactory = fn(WidgetArgs) -> Result<Arc<dyn Widget>, LocatorError>;

/// A registry entry: a live instance or a class spec awaiting resolution.
#[derive(Clone)]
pub enum WidgetSpec {
    Instance(Arc<dyn Widget>),
    Class { class: String, deps: Vec<String> },
}

impl WidgetSpec {
    /// Spec for a class with no dependencies.
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class {
            class: class.into(),
            deps: Vec::new(),
        }
    }

    /// Spec for a class with named dependencies.
    pub fn class_with(class: impl Into<String>, deps: &[&str]) -> Self {
        Self::Class {
            class: class.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl std::fmt::Debug for WidgetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("WidgetSpec::Instance(..)"),
            Self::Class { class, deps } => f
                .debug_struct("WidgetSpec::Class")
                .field("class", class)
                .field("deps", deps)
                .finish(),
        }
    }
}

/// Name-to-widget registry and factory.
pub struct WidgetLocator {
    registry: IndexMap<String, WidgetSpec>,
    factories: HashMap<String, WidgetFactory>,
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
    view: Option<Arc<dyn ViewBridge>>,
}

impl WidgetLocator {
    /// Empty locator over a template set; built-in classes are registered,
    /// but no widget names are.
    pub fn new(templates: Arc<StringTemplate>) -> Self {
        let mut locator = Self {
            registry: IndexMap::new(),
            factories: HashMap::new(),
            templates,
            formatter: AttributeFormatter::new(),
            view: None,
        };
        locator.register_builtin_classes();
        locator
    }

    /// Locator with the conventional widget names wired to the built-in
    /// classes, including the `_default` fallback.
    pub fn with_defaults(templates: Arc<StringTemplate>) -> Self {
        let mut locator = Self::new(templates);
        locator.add([
            (DEFAULT_NAME.to_string(), WidgetSpec::class("Basic")),
            ("button".to_string(), WidgetSpec::class("Button")),
            ("checkbox".to_string(), WidgetSpec::class("Checkbox")),
            ("file".to_string(), WidgetSpec::class("File")),
            ("hidden".to_string(), WidgetSpec::class("Hidden")),
            ("label".to_string(), WidgetSpec::class("Label")),
            ("nesting_label".to_string(), WidgetSpec::class("NestingLabel")),
            (
                "radio".to_string(),
                WidgetSpec::class_with("Radio", &["nesting_label"]),
            ),
            (
                "multi_checkbox".to_string(),
                WidgetSpec::class_with("MultiCheckbox", &["nesting_label"]),
            ),
            ("select_box".to_string(), WidgetSpec::class("SelectBox")),
            ("textarea".to_string(), WidgetSpec::class("Textarea")),
            ("datetime".to_string(), WidgetSpec::class("DateTime")),
            (
                "year".to_string(),
                WidgetSpec::class_with("Year", &["select_box"]),
            ),
        ]);
        locator
    }

    /// Locator over the default template set and default names.
    pub fn standard() -> Self {
        Self::with_defaults(Arc::new(default_templates()))
    }

    /// Attach the view handle injected for `_view` dependencies (builder).
    pub fn with_view(mut self, view: Arc<dyn ViewBridge>) -> Self {
        self.view = Some(view);
        self
    }

    /// Replace the attribute formatter handed to constructed widgets
    /// (builder).
    pub fn with_formatter(mut self, formatter: AttributeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Register an additional widget class factory.
    pub fn register_class(&mut self, class: impl Into<String>, factory: WidgetFactory) {
        self.factories.insert(class.into(), factory);
    }

    /// Merge specs/instances into the registry, replacing same-name entries.
    pub fn add<I>(&mut self, specs: I)
    where
        I: IntoIterator<Item = (String, WidgetSpec)>,
    {
        for (name, spec) in specs {
            self.registry.insert(name, spec);
        }
    }

    /// Bulk-load a JSON definitions file:
    /// `{"radio": ["Radio", "nesting_label"], "tags": "MultiCheckbox"}`.
    pub fn load(&mut self, path: &Path) -> Result<(), LocatorError> {
        let text = std::fs::read_to_string(path).map_err(|source| LocatorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: Value =
            serde_json::from_str(&text).map_err(|err| LocatorError::InvalidDefinitions {
                path: path.display().to_string(),
                detail: err.to_string(),
            })?;
        let object = parsed
            .as_object()
            .ok_or_else(|| LocatorError::InvalidDefinitions {
                path: path.display().to_string(),
                detail: "top level value must be an object".to_string(),
            })?;
        for (name, value) in object {
            let spec = match value {
                Value::String(class) => WidgetSpec::class(class.clone()),
                Value::Array(parts) if !parts.is_empty() => {
                    let mut names = parts.iter().filter_map(|p| p.as_str());
                    let class = names.next().ok_or_else(|| LocatorError::InvalidDefinitions {
                        path: path.display().to_string(),
                        detail: format!("spec for '{name}' must start with a class name"),
                    })?;
                    WidgetSpec::Class {
                        class: class.to_string(),
                        deps: names.map(str::to_string).collect(),
                    }
                }
                _ => {
                    return Err(LocatorError::InvalidDefinitions {
                        path: path.display().to_string(),
                        detail: format!("spec for '{name}' must be a string or non-empty array"),
                    });
                }
            };
            self.registry.insert(name.clone(), spec);
        }
        Ok(())
    }

    /// Resolve a name to a widget instance (lazy singleton per name).
    ///
    /// Unknown names fall back to `_default` when registered.
    pub fn get(&mut self, name: &str) -> Result<Arc<dyn Widget>, LocatorError> {
        let mut resolving = HashSet::new();
        self.resolve(name, &mut resolving)
    }

    /// Reset the registry to empty. Factories and template set survive.
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    fn resolve(
        &mut self,
        name: &str,
        resolving: &mut HashSet<String>,
    ) -> Result<Arc<dyn Widget>, LocatorError> {
        let key = if self.registry.contains_key(name) {
            name.to_string()
        } else if self.registry.contains_key(DEFAULT_NAME) {
            DEFAULT_NAME.to_string()
        } else {
            return Err(LocatorError::UnknownWidget {
                name: name.to_string(),
            });
        };
        let spec = self.registry.get(&key).cloned();
        let (class, deps) = match spec {
            Some(WidgetSpec::Instance(widget)) => return Ok(widget),
            Some(WidgetSpec::Class { class, deps }) => (class, deps),
            None => unreachable!("registry key checked above"),
        };
        if !resolving.insert(key.clone()) {
            return Err(LocatorError::CyclicDependency { name: key });
        }

        let mut widgets = Vec::new();
        let mut view = None;
        for dep in &deps {
            if dep == VIEW_DEP {
                view = Some(self.view.clone().ok_or_else(|| {
                    LocatorError::ViewUnavailable {
                        name: key.clone(),
                    }
                })?);
            } else {
                widgets.push(self.resolve(dep, resolving)?);
            }
        }
        let factory = self
            .factories
            .get(&class)
            .copied()
            .ok_or_else(|| LocatorError::UnknownClass {
                class: class.clone(),
            })?;
        let widget = factory(WidgetArgs {
            templates: self.templates.clone(),
            formatter: self.formatter.clone(),
            widgets,
            view,
        })?;
        resolving.remove(&key);
        self.registry
            .insert(key, WidgetSpec::Instance(widget.clone()));
        Ok(widget)
    }

    fn register_builtin_classes(&mut self) {
        self.register_class("Basic", |args| {
            Ok(Arc::new(BasicWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Button", |args| {
            Ok(Arc::new(ButtonWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Checkbox", |args| {
            Ok(Arc::new(CheckboxWidget::new(args.templates, args.formatter)))
        });
        self.register_class("DateTime", |args| {
            Ok(Arc::new(DateTimeWidget::new(args.templates, args.formatter)))
        });
        self.register_class("File", |args| {
            Ok(Arc::new(FileWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Hidden", |args| {
            Ok(Arc::new(HiddenWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Label", |args| {
            Ok(Arc::new(LabelWidget::new(args.templates, args.formatter)))
        });
        self.register_class("NestingLabel", |args| {
            Ok(Arc::new(LabelWidget::nesting(args.templates, args.formatter)))
        });
        self.register_class("Radio", |mut args| {
            let label = args.dependency("Radio", "label")?;
            Ok(Arc::new(RadioWidget::new(
                args.templates,
                args.formatter,
                label,
            )))
        });
        self.register_class("MultiCheckbox", |mut args| {
            let label = args.dependency("MultiCheckbox", "label")?;
            Ok(Arc::new(MultiCheckboxWidget::new(
                args.templates,
                args.formatter,
                label,
            )))
        });
        self.register_class("SelectBox", |args| {
            Ok(Arc::new(SelectBoxWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Textarea", |args| {
            Ok(Arc::new(TextareaWidget::new(args.templates, args.formatter)))
        });
        self.register_class("Year", |mut args| {
            let select = args.dependency("Year", "select")?;
            Ok(Arc::new(YearWidget::new(select)))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::data::DataBag;
    use serde_json::json;

    #[test]
    fn resolution_is_memoized() {
        let mut locator = WidgetLocator::standard();
        let first = locator.get("radio").unwrap();
        let second = locator.get("radio").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let mut locator = WidgetLocator::standard();
        let widget = locator.get("no-such-widget").unwrap();
        let data = DataBag::from(json!({"name": "x"}));
        let html = widget.render(&data, &NullContext).unwrap();
        assert!(html.starts_with("<input type=\"text\""));
    }

    #[test]
    fn unknown_name_without_default_errors() {
        let mut locator = WidgetLocator::new(Arc::new(crate::default_templates()));
        assert!(matches!(
            locator.get("missing"),
            Err(LocatorError::UnknownWidget { .. })
        ));
    }

    #[test]
    fn unknown_class_errors() {
        let mut locator = WidgetLocator::standard();
        locator.add([("bad".to_string(), WidgetSpec::class("NoSuchClass"))]);
        assert!(matches!(
            locator.get("bad"),
            Err(LocatorError::UnknownClass { .. })
        ));
    }

    #[test]
    fn cyclic_spec_fails_fast() {
        let mut locator = WidgetLocator::standard();
        locator.add([
            ("a".to_string(), WidgetSpec::class_with("Radio", &["b"])),
            ("b".to_string(), WidgetSpec::class_with("Radio", &["a"])),
        ]);
        assert!(matches!(
            locator.get("a"),
            Err(LocatorError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn self_cycle_fails_fast() {
        let mut locator = WidgetLocator::standard();
        locator.add([("a".to_string(), WidgetSpec::class_with("Radio", &["a"]))]);
        assert!(matches!(
            locator.get("a"),
            Err(LocatorError::CyclicDependency { name }) if name == "a"
        ));
    }

    #[test]
    fn view_handle_reaches_factories_by_identity() {
        struct Bridge;
        impl ViewBridge for Bridge {}

        struct ViewProbe {
            view: Arc<dyn ViewBridge>,
        }
        impl Widget for ViewProbe {
            fn render(
                &self,
                _data: &DataBag,
                _ctx: &dyn crate::FormContext,
            ) -> Result<String, crate::WidgetError> {
                Ok(String::new())
            }
        }

        thread_local! {
            static SEEN: std::cell::RefCell<Option<Arc<dyn ViewBridge>>> =
                const { std::cell::RefCell::new(None) };
        }

        let bridge: Arc<dyn ViewBridge> = Arc::new(Bridge);
        let mut locator = WidgetLocator::standard().with_view(bridge.clone());
        locator.register_class("ViewProbe", |args| {
            let view = args.view.ok_or(LocatorError::ViewUnavailable {
                name: "probe".to_string(),
            })?;
            SEEN.with(|cell| *cell.borrow_mut() = Some(view.clone()));
            Ok(Arc::new(ViewProbe { view }))
        });
        locator.add([(
            "probe".to_string(),
            WidgetSpec::class_with("ViewProbe", &["_view"]),
        )]);
        locator.get("probe").unwrap();
        SEEN.with(|cell| {
            let seen = cell.borrow();
            assert!(Arc::ptr_eq(seen.as_ref().unwrap(), &bridge));
        });
    }

    #[test]
    fn view_dep_without_handle_errors() {
        let mut locator = WidgetLocator::standard();
        locator.add([(
            "probe".to_string(),
            WidgetSpec::class_with("Basic", &["_view"]),
        )]);
        assert!(matches!(
            locator.get("probe"),
            Err(LocatorError::ViewUnavailable { .. })
        ));
    }

    #[test]
    fn instances_can_be_registered_directly() {
        let mut locator = WidgetLocator::standard();
        let existing = locator.get("checkbox").unwrap();
        locator.add([("other".to_string(), WidgetSpec::Instance(existing.clone()))]);
        let resolved = locator.get("other").unwrap();
        assert!(Arc::ptr_eq(&existing, &resolved));
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut locator = WidgetLocator::standard();
        locator.clear();
        assert!(matches!(
            locator.get("radio"),
            Err(LocatorError::UnknownWidget { .. })
        ));
    }
}

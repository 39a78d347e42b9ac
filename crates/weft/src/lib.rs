#![forbid(unsafe_code)]

//! weft public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from the member crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Template re-exports ---------------------------------------------------

pub use weft_template::{
    AttrMap, AttributeFormatter, DEFAULT_MINIMIZED, StringTemplate, TemplateError, TemplateVars,
    escape,
};

// --- Widget re-exports -----------------------------------------------------

pub use weft_widgets::{
    BasicWidget, ButtonWidget, CheckboxWidget, DataBag, DateTimeWidget, FieldMeta, FileWidget,
    FormContext, HiddenWidget, IdPool, LabelWidget, LocatorError, MapContext,
    MultiCheckboxWidget, NullContext, RadioWidget, SelectBoxWidget, TextareaWidget, ViewBridge,
    Widget, WidgetError, WidgetLocator, WidgetSpec, YearWidget, default_templates,
};

// --- View re-exports -------------------------------------------------------

pub use weft_view::{
    ClosureEngine, ElementCache, ElementCacheOptions, ElementOptions, EntityPath, Helper,
    HelperCollection, MemoryCache, PathResolver, RenderError, RenderKind, Scope, TemplateEngine,
    View, ViewBlock, ViewBuilder, ViewListener, ViewPaths,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for weft apps.
#[derive(Debug)]
pub enum Error {
    /// Template substitution or definition failure.
    Template(TemplateError),
    /// Widget rendering failure.
    Widget(WidgetError),
    /// Widget registry configuration failure.
    Locator(LocatorError),
    /// View rendering failure.
    Render(RenderError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(err) => write!(f, "{err}"),
            Self::Widget(err) => write!(f, "{err}"),
            Self::Locator(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            Self::Widget(err) => Some(err),
            Self::Locator(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<TemplateError> for Error {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<WidgetError> for Error {
    fn from(err: WidgetError) -> Self {
        Self::Widget(err)
    }
}

impl From<LocatorError> for Error {
    fn from(err: LocatorError) -> Self {
        Self::Locator(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

/// Standard result type for weft APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DataBag, ElementOptions, Error, FormContext, NullContext, RenderError, Result,
        StringTemplate, View, ViewBlock, ViewBuilder, ViewPaths, Widget, WidgetError,
        WidgetLocator, default_templates,
    };

    pub use crate::{template, view, widgets};
}

pub use weft_template as template;
pub use weft_view as view;
pub use weft_widgets as widgets;

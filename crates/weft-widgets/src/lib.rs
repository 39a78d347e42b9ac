#![forbid(unsafe_code)]

//! Form widgets: data-bag + context in, HTML fragment out.
//!
//! Every widget implements [`Widget`]: it consumes a loose [`DataBag`] of
//! rendering directives plus a [`FormContext`] supplying per-field metadata,
//! and produces one HTML fragment through the shared
//! [`StringTemplate`](weft_template::StringTemplate) set. Widgets are
//! value-like and stateless per call; grouped inputs thread an explicit
//! [`IdPool`](id_pool::IdPool) through their option recursion instead of
//! keeping per-instance id state.
//!
//! [`WidgetLocator`](locator::WidgetLocator) resolves widget names to
//! instances, injecting widget-to-widget dependencies (radio needs a label
//! widget, year needs a select widget) from the same registry.

pub mod basic;
pub mod button;
pub mod checkbox;
pub mod context;
pub mod data;
pub mod datetime;
pub mod file;
pub mod hidden;
pub mod id_pool;
pub mod label;
pub mod locator;
pub mod multi_checkbox;
pub mod options;
pub mod radio;
pub mod select_box;
pub mod textarea;
pub mod year;

pub use basic::BasicWidget;
pub use button::ButtonWidget;
pub use checkbox::CheckboxWidget;
pub use context::{FieldMeta, FormContext, MapContext, NullContext};
pub use data::DataBag;
pub use datetime::DateTimeWidget;
pub use file::FileWidget;
pub use hidden::HiddenWidget;
pub use id_pool::IdPool;
pub use label::LabelWidget;
pub use locator::{LocatorError, ViewBridge, WidgetArgs, WidgetLocator, WidgetSpec};
pub use multi_checkbox::MultiCheckboxWidget;
pub use radio::RadioWidget;
pub use select_box::SelectBoxWidget;
pub use textarea::TextareaWidget;
pub use year::YearWidget;

use weft_template::{StringTemplate, TemplateError};

/// Errors raised while rendering a widget.
#[derive(Debug)]
pub enum WidgetError {
    /// An input `type` outside the supported set was requested.
    InvalidType { type_name: String },
    /// A numeric range with `max < min` was requested.
    InvalidRange { min: i32, max: i32 },
    /// A value could not be interpreted by the widget.
    InvalidValue { detail: String },
    /// A required template was missing from the template set.
    Template(TemplateError),
}

impl std::fmt::Display for WidgetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidType { type_name } => {
                write!(f, "invalid input type '{type_name}'")
            }
            Self::InvalidRange { min, max } => {
                write!(f, "invalid range: max ({max}) is below min ({min})")
            }
            Self::InvalidValue { detail } => write!(f, "invalid widget value: {detail}"),
            Self::Template(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TemplateError> for WidgetError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

/// A renderable form control.
pub trait Widget {
    /// Turn a data bag plus field context into one HTML fragment.
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError>;

    /// Field names whose submitted values must be integrity-protected by an
    /// external tamper-detection mechanism. Widgets that produce no
    /// securable input (labels) return an empty list.
    fn secure_fields(&self, data: &DataBag) -> Vec<String> {
        match data.text("name") {
            Some(name) if !name.is_empty() => vec![name],
            _ => Vec::new(),
        }
    }
}

/// The default template set covering every built-in widget.
pub fn default_templates() -> StringTemplate {
    StringTemplate::with([
        ("attribute", "{{name}}=\"{{value}}\""),
        ("compact_attribute", "{{name}}=\"{{value}}\""),
        ("button", "<button{{attrs}}>{{text}}</button>"),
        (
            "checkbox",
            "<input type=\"checkbox\" name=\"{{name}}\" value=\"{{value}}\"{{attrs}}>",
        ),
        ("file", "<input type=\"file\" name=\"{{name}}\"{{attrs}}>"),
        ("fieldset_group", "<fieldset{{attrs}}>{{content}}</fieldset>"),
        ("fieldset_title", "<legend>{{text}}</legend>"),
        ("input", "<input type=\"{{type}}\" name=\"{{name}}\"{{attrs}}>"),
        ("label", "<label{{attrs}}>{{text}}</label>"),
        (
            "nesting_label",
            "{{hidden}}<label{{attrs}}>{{input}}{{text}}</label>",
        ),
        ("option", "<option value=\"{{value}}\"{{attrs}}>{{text}}</option>"),
        (
            "optgroup",
            "<optgroup label=\"{{label}}\"{{attrs}}>{{content}}</optgroup>",
        ),
        (
            "multicheckbox",
            "<input type=\"checkbox\" name=\"{{name}}\" value=\"{{value}}\"{{attrs}}>",
        ),
        (
            "radio",
            "<input type=\"radio\" name=\"{{name}}\" value=\"{{value}}\"{{attrs}}>",
        ),
        ("radio_wrapper", "{{label}}"),
        ("select", "<select name=\"{{name}}\"{{attrs}}>{{content}}</select>"),
        (
            "select_multiple",
            "<select name=\"{{name}}[]\" multiple=\"multiple\"{{attrs}}>{{content}}</select>",
        ),
        ("textarea", "<textarea name=\"{{name}}\"{{attrs}}>{{value}}</textarea>"),
    ])
}

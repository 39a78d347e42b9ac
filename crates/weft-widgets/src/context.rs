#![forbid(unsafe_code)]

//! Per-field metadata adapter.
//!
//! A [`FormContext`] is supplied by a form-data-binding collaborator (a
//! bound record, a plain map, anything). Widgets query it to decorate
//! generated markup: `required`, `maxlength`, numeric `step`. Two
//! implementations ship: [`NullContext`] (knows nothing) and
//! [`MapContext`] (fed from explicit [`FieldMeta`] entries; the usual test
//! double).

use indexmap::IndexMap;
use weft_template::AttrMap;

/// Supplies per-field metadata to widgets.
pub trait FormContext {
    /// Whether the field is required, if known.
    fn is_required(&self, field: &str) -> Option<bool>;

    /// Declared maximum length of the field, if known.
    fn max_length(&self, field: &str) -> Option<u64>;

    /// Declared data type of the field (`"string"`, `"decimal"`, ...), if
    /// known.
    fn field_type(&self, field: &str) -> Option<String>;

    /// Additional declared attributes of the field (for example decimal
    /// `precision`).
    fn attributes(&self, field: &str) -> AttrMap;
}

/// A context that knows nothing about any field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullContext;

impl FormContext for NullContext {
    fn is_required(&self, _field: &str) -> Option<bool> {
        None
    }

    fn max_length(&self, _field: &str) -> Option<u64> {
        None
    }

    fn field_type(&self, _field: &str) -> Option<String> {
        None
    }

    fn attributes(&self, _field: &str) -> AttrMap {
        AttrMap::new()
    }
}

/// Declared metadata for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
    pub required: Option<bool>,
    pub max_length: Option<u64>,
    pub field_type: Option<String>,
    pub attributes: AttrMap,
}

impl FieldMeta {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field required (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Declare a maximum length (builder).
    pub fn max_length(mut self, length: u64) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Declare the data type (builder).
    pub fn field_type(mut self, ty: impl Into<String>) -> Self {
        self.field_type = Some(ty.into());
        self
    }

    /// Declare an extra attribute such as `precision` (builder).
    pub fn attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// A context backed by an explicit field map.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    fields: IndexMap<String, FieldMeta>,
}

impl MapContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a field (builder).
    pub fn field(mut self, name: impl Into<String>, meta: FieldMeta) -> Self {
        self.fields.insert(name.into(), meta);
        self
    }
}

impl FormContext for MapContext {
    fn is_required(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(|m| m.required)
    }

    fn max_length(&self, field: &str) -> Option<u64> {
        self.fields.get(field).and_then(|m| m.max_length)
    }

    fn field_type(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(|m| m.field_type.clone())
    }

    fn attributes(&self, field: &str) -> AttrMap {
        self.fields
            .get(field)
            .map(|m| m.attributes.clone())
            .unwrap_or_default()
    }
}

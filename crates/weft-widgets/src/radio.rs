#![forbid(unsafe_code)]

//! Radio group widget.
//!
//! Renders one `<input type="radio">` per option, each with a unique DOM id
//! drawn from an [`IdPool`] scoped to the render call, and an adjoining
//! label produced by the injected label widget (conventionally the nesting
//! variant). Titled sub-groups render as fieldset/legend.

use crate::context::FormContext;
use crate::data::{DataBag, is_truthy, loose_contains, scalar_text};
use crate::id_pool::IdPool;
use crate::options::{OptionEntry, normalize, normalize_empty};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttrMap, AttributeFormatter, StringTemplate, TemplateVars, escape};

/// Per-render state threaded through the option recursion.
struct RenderPass<'a> {
    name: String,
    val: Option<String>,
    disabled: Value,
    show_label: bool,
    escape: bool,
    base_attrs: AttrMap,
    ctx: &'a dyn FormContext,
}

pub struct RadioWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
    label: Arc<dyn Widget>,
}

impl RadioWidget {
    pub fn new(
        templates: Arc<StringTemplate>,
        formatter: AttributeFormatter,
        label: Arc<dyn Widget>,
    ) -> Self {
        Self {
            templates,
            formatter,
            label,
        }
    }

    fn render_entries(
        &self,
        entries: &[OptionEntry],
        pass: &RenderPass<'_>,
        pool: &mut IdPool,
    ) -> Result<String, WidgetError> {
        let mut out = String::new();
        for entry in entries {
            match entry {
                OptionEntry::Item(item) => {
                    out.push_str(&self.render_input(item, pass, pool)?);
                }
                OptionEntry::Group {
                    label,
                    attrs,
                    entries,
                } => {
                    let mut title_vars = TemplateVars::new();
                    title_vars.insert("text".to_string(), escape::html(label));
                    let title = self.templates.format("fieldset_title", &title_vars)?;
                    let inner = self.render_entries(entries, pass, pool)?;
                    let mut group_vars = TemplateVars::new();
                    group_vars.insert("content".to_string(), format!("{title}{inner}"));
                    group_vars.insert(
                        "attrs".to_string(),
                        self.formatter.format(&self.templates, attrs, &[]),
                    );
                    out.push_str(&self.templates.format("fieldset_group", &group_vars)?);
                }
            }
        }
        Ok(out)
    }

    fn render_input(
        &self,
        item: &crate::options::OptionItem,
        pass: &RenderPass<'_>,
        pool: &mut IdPool,
    ) -> Result<String, WidgetError> {
        let id = pool.dom_id(&pass.name, &item.value);
        let mut attrs = pass.base_attrs.clone();
        for (key, value) in &item.attrs {
            attrs.insert(key.clone(), value.clone());
        }
        let show_label =
            pass.show_label && !matches!(attrs.get("label"), Some(Value::Bool(false)));
        attrs.shift_remove("label");
        attrs.insert("id".to_string(), json!(id));
        if pass.val.as_deref() == Some(item.value.as_str()) {
            attrs.insert("checked".to_string(), Value::Bool(true));
        }
        if disabled_for(&pass.disabled, &item.value) {
            attrs.insert("disabled".to_string(), Value::Bool(true));
        }

        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), pass.name.clone());
        vars.insert("value".to_string(), escape::html(&item.value));
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(&self.templates, &attrs, &[]),
        );
        let input = self.templates.format("radio", &vars)?;

        let rendered = if show_label {
            let mut label_data = DataBag::new();
            label_data.insert("text", json!(item.text));
            label_data.insert("for", json!(id));
            label_data.insert("escape", json!(pass.escape));
            label_data.insert("input", json!(input));
            self.label.render(&label_data, pass.ctx)?
        } else {
            input.clone()
        };

        let mut wrapper = TemplateVars::new();
        wrapper.insert("label".to_string(), rendered);
        wrapper.insert("input".to_string(), input);
        Ok(self.templates.format("radio_wrapper", &wrapper)?)
    }
}

/// Whole-set disabling (truthy scalar) or per-value disabling (list).
fn disabled_for(disabled: &Value, value: &str) -> bool {
    match disabled {
        Value::Array(_) => loose_contains(disabled, &json!(value)),
        other => is_truthy(other),
    }
}

impl Widget for RadioWidget {
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("widget_render", widget = "Radio").entered();

        let data = data.with_defaults(&[
            ("name", json!("")),
            ("options", Value::Null),
            ("val", Value::Null),
            ("empty", json!(false)),
            ("disabled", Value::Null),
            ("label", json!(true)),
            ("escape", json!(true)),
            ("template_vars", json!({})),
        ]);
        let mut entries = normalize(data.get("options").unwrap_or(&Value::Null));
        if let Some(empty) = normalize_empty(data.get("empty").unwrap_or(&Value::Null)) {
            entries.insert(0, OptionEntry::Item(empty));
        }
        let pass = RenderPass {
            name: data.text_or("name", ""),
            // Boolean values compare against the conventional "1"/"0" forms.
            val: data.get("val").and_then(scalar_text),
            disabled: data.get("disabled").cloned().unwrap_or(Value::Null),
            show_label: !matches!(data.get("label"), Some(Value::Bool(false))),
            escape: data.truthy("escape"),
            base_attrs: data.to_attrs(&[
                "name",
                "options",
                "val",
                "empty",
                "disabled",
                "label",
                "escape",
                "template_vars",
            ]),
            ctx,
        };
        let mut pool = IdPool::new();
        self.render_entries(&entries, &pass, &mut pool)
    }
}

#![forbid(unsafe_code)]

//! Checkbox set widget.
//!
//! Same option iteration and grouping as the radio widget, but emits
//! `name[]`-style array field names and accepts a multi-value `val` for the
//! checked-state test: strict string membership for non-numeric values,
//! loose numeric membership otherwise (so `"1"` still matches in `[1, 2]`).

use crate::context::FormContext;
use crate::data::{DataBag, is_truthy, loose_contains};
use crate::id_pool::IdPool;
use crate::options::{OptionEntry, OptionItem, normalize, normalize_empty};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttrMap, AttributeFormatter, StringTemplate, TemplateVars, escape};

struct RenderPass<'a> {
    name: String,
    val: Value,
    disabled: Value,
    show_label: bool,
    escape: bool,
    base_attrs: AttrMap,
    ctx: &'a dyn FormContext,
}

pub struct MultiCheckboxWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
    label: Arc<dyn Widget>,
}

impl MultiCheckboxWidget {
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
        item: &OptionItem,
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
        if loose_contains(&pass.val, &json!(item.value)) {
            attrs.insert("checked".to_string(), Value::Bool(true));
        }
        if disabled_for(&pass.disabled, &item.value) {
            attrs.insert("disabled".to_string(), Value::Bool(true));
        }

        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), format!("{}[]", pass.name));
        vars.insert("value".to_string(), escape::html(&item.value));
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(&self.templates, &attrs, &[]),
        );
        let input = self.templates.format("multicheckbox", &vars)?;

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

fn disabled_for(disabled: &Value, value: &str) -> bool {
    match disabled {
        Value::Array(_) => loose_contains(disabled, &json!(value)),
        other => is_truthy(other),
    }
}

impl Widget for MultiCheckboxWidget {
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("widget_render", widget = "MultiCheckbox").entered();

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
            val: data.get("val").cloned().unwrap_or(Value::Null),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::default_templates;
    use crate::label::LabelWidget;

    fn widget() -> MultiCheckboxWidget {
        let templates = Arc::new(default_templates());
        let formatter = AttributeFormatter::new();
        let label = Arc::new(LabelWidget::nesting(templates.clone(), formatter.clone()));
        MultiCheckboxWidget::new(templates, formatter, label)
    }

    #[test]
    fn emits_array_field_names() {
        let data = DataBag::from(json!({
            "name": "tags",
            "options": {"a": "A", "b": "B"},
        }));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("name=\"tags[]\""));
    }

    #[test]
    fn multi_value_val_checks_members() {
        let data = DataBag::from(json!({
            "name": "tags",
            "options": {"a": "A", "b": "B", "c": "C"},
            "val": ["a", "c"],
        }));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("value=\"a\" id=\"tags-a\" checked=\"checked\""));
        assert!(!html.contains("value=\"b\" id=\"tags-b\" checked"));
        assert!(html.contains("value=\"c\" id=\"tags-c\" checked=\"checked\""));
    }

    #[test]
    fn numeric_membership_is_loose() {
        let data = DataBag::from(json!({
            "name": "n",
            "options": {"1": "One", "2": "Two"},
            "val": [1],
        }));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("value=\"1\" id=\"n-1\" checked=\"checked\""));
        assert!(!html.contains("value=\"2\" id=\"n-2\" checked"));
    }

    #[test]
    fn grouped_options_render_fieldsets() {
        let data = DataBag::from(json!({
            "name": "pick",
            "options": {"Group": {"x": "X"}},
        }));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("<fieldset><legend>Group</legend>"));
        assert!(html.contains("name=\"pick[]\""));
    }
}

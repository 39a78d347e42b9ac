#![forbid(unsafe_code)]

//! Select box widget with nested optgroup support.

use crate::context::FormContext;
use crate::data::{DataBag, is_truthy, loose_contains, scalar_text};
use crate::options::{OptionEntry, OptionItem, normalize, normalize_empty};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars, escape};

pub struct SelectBoxWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl SelectBoxWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }

    fn render_entries(
        &self,
        entries: &[OptionEntry],
        val: &Value,
        disabled: &Value,
        escape_text: bool,
    ) -> Result<String, WidgetError> {
        let mut out = String::new();
        for entry in entries {
            match entry {
                OptionEntry::Item(item) => {
                    out.push_str(&self.render_option(item, val, disabled, escape_text)?);
                }
                OptionEntry::Group {
                    label,
                    attrs,
                    entries,
                } => {
                    let content = self.render_entries(entries, val, disabled, escape_text)?;
                    let mut vars = TemplateVars::new();
                    vars.insert("label".to_string(), escape::html(label));
                    vars.insert("content".to_string(), content);
                    vars.insert(
                        "attrs".to_string(),
                        self.formatter.format(&self.templates, attrs, &[]),
                    );
                    out.push_str(&self.templates.format("optgroup", &vars)?);
                }
            }
        }
        Ok(out)
    }

    fn render_option(
        &self,
        item: &OptionItem,
        val: &Value,
        disabled: &Value,
        escape_text: bool,
    ) -> Result<String, WidgetError> {
        let mut attrs = item.attrs.clone();
        if is_selected(&item.value, val) {
            attrs.insert("selected".to_string(), Value::Bool(true));
        }
        if let Value::Array(_) = disabled
            && loose_contains(disabled, &json!(item.value))
        {
            attrs.insert("disabled".to_string(), Value::Bool(true));
        }
        let mut vars = TemplateVars::new();
        vars.insert("value".to_string(), escape::html(&item.value));
        vars.insert(
            "text".to_string(),
            if escape_text {
                escape::html(&item.text)
            } else {
                item.text.clone()
            },
        );
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(&self.templates, &attrs, &[]),
        );
        Ok(self.templates.format("option", &vars)?)
    }
}

/// Selection test. HTML selects cannot represent boolean `false` natively,
/// so a `false` form value coerces to `"0"` before comparison.
fn is_selected(option_value: &str, val: &Value) -> bool {
    match val {
        Value::Null => false,
        Value::Array(_) => loose_contains(val, &json!(option_value)),
        scalar => scalar_text(scalar).as_deref() == Some(option_value),
    }
}

impl Widget for SelectBoxWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("widget_render", widget = "SelectBox").entered();

        let mut data = data.with_defaults(&[
            ("name", json!("")),
            ("options", Value::Null),
            ("val", Value::Null),
            ("empty", json!(false)),
            ("disabled", Value::Null),
            ("escape", json!(true)),
            ("template_vars", json!({})),
        ]);
        let mut entries = normalize(data.get("options").unwrap_or(&Value::Null));
        if let Some(empty) = normalize_empty(data.get("empty").unwrap_or(&Value::Null)) {
            entries.insert(0, OptionEntry::Item(empty));
        }
        let val = data.get("val").cloned().unwrap_or(Value::Null);
        let disabled = data.get("disabled").cloned().unwrap_or(Value::Null);
        let escape_text = data.truthy("escape");
        let multiple = data.truthy("multiple");

        // A whole-set `disabled: true` stays in the attribute pass and
        // disables the select element itself; a list disables options.
        if matches!(data.get("disabled"), Some(Value::Array(_)) | Some(Value::Null)) {
            data.remove("disabled");
        }
        let template = if multiple { "select_multiple" } else { "select" };
        data.remove("multiple");

        let content = self.render_entries(&entries, &val, &disabled, escape_text)?;
        let mut vars = TemplateVars::new();
        if let Some(Value::Object(extra)) = data.get("template_vars") {
            for (key, value) in extra {
                vars.insert(key.clone(), scalar_text(value).unwrap_or_default());
            }
        }
        vars.insert("name".to_string(), data.text_or("name", ""));
        vars.insert("content".to_string(), content);
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["name", "options", "val", "empty", "escape", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format(template, &vars)?)
    }
}

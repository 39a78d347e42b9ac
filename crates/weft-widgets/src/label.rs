#![forbid(unsafe_code)]

//! Label widgets.
//!
//! [`LabelWidget`] renders a sibling `<label>`; the nesting variant wraps
//! its input inside the label element (`nesting_label` template), which is
//! how radio and checkbox sets attach labels. The only difference between
//! the two is the selected template name.

use crate::context::FormContext;
use crate::data::{DataBag, scalar_text};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars, escape};

#[derive(Debug, Clone)]
pub struct LabelWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
    template: &'static str,
}

impl LabelWidget {
    /// Sibling-label variant (`label` template).
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
            template: "label",
        }
    }

    /// Label-wrapping-its-input variant (`nesting_label` template).
    pub fn nesting(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
            template: "nesting_label",
        }
    }
}

impl Widget for LabelWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let data = data.with_defaults(&[
            ("text", json!("")),
            ("input", json!("")),
            ("hidden", json!("")),
            ("escape", json!(true)),
            ("template_vars", json!({})),
        ]);
        let text = data.text_or("text", "");
        let text = if data.truthy("escape") {
            escape::html(&text)
        } else {
            text
        };

        let mut vars = TemplateVars::new();
        if let Some(Value::Object(extra)) = data.get("template_vars") {
            for (key, value) in extra {
                vars.insert(key.clone(), scalar_text(value).unwrap_or_default());
            }
        }
        vars.insert("text".to_string(), text);
        vars.insert("input".to_string(), data.text_or("input", ""));
        vars.insert("hidden".to_string(), data.text_or("hidden", ""));
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["text", "input", "hidden", "escape", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format(self.template, &vars)?)
    }

    /// Labels produce no securable input.
    fn secure_fields(&self, _data: &DataBag) -> Vec<String> {
        Vec::new()
    }
}

#![forbid(unsafe_code)]

//! Single checkbox widget.

use crate::context::FormContext;
use crate::data::{DataBag, scalar_text};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars, escape};

/// Renders one `<input type="checkbox">`.
#[derive(Debug, Clone)]
pub struct CheckboxWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl CheckboxWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }

    /// Checked-state law: an explicit `checked` key wins; otherwise the
    /// string form of `val` must equal the string form of `value`.
    fn is_checked(data: &DataBag) -> bool {
        if data.contains("checked") {
            return data.truthy("checked");
        }
        let val = data.get("val").and_then(scalar_text);
        let value = data.get("value").and_then(scalar_text);
        match (val, value) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Widget for CheckboxWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let mut data = data.with_defaults(&[
            ("name", json!("")),
            ("value", json!("1")),
            ("val", Value::Null),
            ("disabled", Value::Null),
            ("template_vars", json!({})),
        ]);
        if Self::is_checked(&data) {
            data.insert("checked", Value::Bool(true));
        }
        // `val` and `checked` inputs informed the decision; only `checked`
        // survives into the attribute pass.
        data.remove("val");

        let mut vars = TemplateVars::new();
        if let Some(Value::Object(extra)) = data.get("template_vars") {
            for (key, value) in extra {
                vars.insert(key.clone(), scalar_text(value).unwrap_or_default());
            }
        }
        vars.insert("name".to_string(), data.text_or("name", ""));
        vars.insert(
            "value".to_string(),
            escape::html(&data.text_or("value", "")),
        );
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["name", "value", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format("checkbox", &vars)?)
    }
}

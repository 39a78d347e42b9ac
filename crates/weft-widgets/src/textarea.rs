#![forbid(unsafe_code)]

//! Textarea widget.

use crate::context::FormContext;
use crate::data::{DataBag, scalar_text};
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars, escape};

/// Renders a `<textarea>` with its value as element text.
#[derive(Debug, Clone)]
pub struct TextareaWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl TextareaWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }
}

impl Widget for TextareaWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let data = data.with_defaults(&[
            ("name", json!("")),
            ("val", json!("")),
            ("escape", json!(true)),
            ("template_vars", json!({})),
        ]);
        let val = data.text_or("val", "");
        let value = if data.truthy("escape") {
            escape::html(&val)
        } else {
            val
        };

        let mut vars = TemplateVars::new();
        if let Some(Value::Object(extra)) = data.get("template_vars") {
            for (key, v) in extra {
                vars.insert(key.clone(), scalar_text(v).unwrap_or_default());
            }
        }
        vars.insert("name".to_string(), data.text_or("name", ""));
        vars.insert("value".to_string(), value);
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["name", "val", "escape", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format("textarea", &vars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::default_templates;

    fn widget() -> TextareaWidget {
        TextareaWidget::new(Arc::new(default_templates()), AttributeFormatter::new())
    }

    #[test]
    fn value_is_element_text() {
        let data = DataBag::from(json!({"name": "bio", "val": "hello", "rows": 4}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert_eq!(html, "<textarea name=\"bio\" rows=\"4\">hello</textarea>");
    }

    #[test]
    fn value_is_escaped_by_default() {
        let data = DataBag::from(json!({"name": "bio", "val": "<b>"}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn escape_false_emits_raw_value() {
        let data = DataBag::from(json!({"name": "bio", "val": "<b>", "escape": false}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("<b>"));
    }
}

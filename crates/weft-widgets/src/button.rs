#![forbid(unsafe_code)]

//! Button widget.

use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use serde_json::json;
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars, escape};

/// Renders a `<button>` element with escaped (by default) text content.
#[derive(Debug, Clone)]
pub struct ButtonWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl ButtonWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }
}

impl Widget for ButtonWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let data = data.with_defaults(&[
            ("text", json!("")),
            ("type", json!("submit")),
            ("escape", json!(true)),
        ]);
        let text = data.text_or("text", "");
        let text = if data.truthy("escape") {
            escape::html(&text)
        } else {
            text
        };

        let mut vars = TemplateVars::new();
        vars.insert("text".to_string(), text);
        vars.insert(
            "attrs".to_string(),
            self.formatter
                .format(&self.templates, &data.to_attrs(&["text", "escape"]), &[]),
        );
        Ok(self.templates.format("button", &vars)?)
    }
}

#![forbid(unsafe_code)]

//! File upload widget.

use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use serde_json::json;
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars};

/// Renders `<input type="file">`. A file input never echoes a value back,
/// whatever the caller put in `val`.
#[derive(Debug, Clone)]
pub struct FileWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl FileWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }
}

impl Widget for FileWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let mut data = data.with_defaults(&[("name", json!("")), ("template_vars", json!({}))]);
        data.remove("val");
        data.remove("value");

        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), data.text_or("name", ""));
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["name", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format("file", &vars)?)
    }
}

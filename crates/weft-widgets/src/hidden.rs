#![forbid(unsafe_code)]

//! Hidden input widget: a basic input with the type pinned to `hidden`.

use crate::basic::BasicWidget;
use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use serde_json::json;
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate};

#[derive(Debug, Clone)]
pub struct HiddenWidget {
    basic: BasicWidget,
}

impl HiddenWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            basic: BasicWidget::new(templates, formatter),
        }
    }
}

impl Widget for HiddenWidget {
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let mut data = data.clone();
        data.insert("type", json!("hidden"));
        self.basic.render(&data, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::default_templates;

    #[test]
    fn pins_type_to_hidden() {
        let w = HiddenWidget::new(Arc::new(default_templates()), AttributeFormatter::new());
        let data = DataBag::from(json!({"name": "token", "val": "abc", "type": "text"}));
        let html = w.render(&data, &NullContext).unwrap();
        assert_eq!(html, "<input type=\"hidden\" name=\"token\" value=\"abc\">");
    }
}

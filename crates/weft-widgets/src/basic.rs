#![forbid(unsafe_code)]

//! Generic `<input>` widget.
//!
//! Renders any single-value input type. Derives `required`, `maxlength`,
//! and `step` from the field context when the caller did not decide them.

use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars};

/// Input types that accept a `maxlength` attribute.
const TEXT_TYPES: &[&str] = &[
    "text", "textarea", "email", "tel", "url", "search", "password",
];

/// Cap on context-derived `maxlength`, to keep pathological schema lengths
/// out of generated markup.
const MAX_LENGTH_CAP: u64 = 100_000;

/// Generic input renderer; also the conventional `_default` fallback.
#[derive(Debug, Clone)]
pub struct BasicWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl BasicWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }

    fn set_required(&self, data: &mut DataBag, ctx: &dyn FormContext, name: &str, ty: &str) {
        if data.contains("required") || data.truthy("disabled") || ty == "hidden" {
            return;
        }
        if let Some(required) = ctx.is_required(name) {
            data.insert("required", Value::Bool(required));
        }
    }

    fn set_max_length(&self, data: &mut DataBag, ctx: &dyn FormContext, name: &str, ty: &str) {
        if data.contains("maxlength") || !TEXT_TYPES.contains(&ty) {
            return;
        }
        if let Some(length) = ctx.max_length(name) {
            data.insert("maxlength", json!(length.min(MAX_LENGTH_CAP)));
        }
    }

    fn set_step(&self, data: &mut DataBag, ctx: &dyn FormContext, name: &str, ty: &str) {
        if data.contains("step") {
            return;
        }
        let ctx_type = ctx.field_type(name);
        let numeric =
            ty == "number" || matches!(ctx_type.as_deref(), Some("decimal") | Some("float"));
        if !numeric {
            return;
        }
        if let Some(precision) = ctx
            .attributes(name)
            .get("precision")
            .and_then(|v| v.as_u64())
        {
            let step = if precision == 0 {
                "1".to_string()
            } else {
                format!("0.{}1", "0".repeat(precision as usize - 1))
            };
            data.insert("step", json!(step));
        }
    }
}

impl Widget for BasicWidget {
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("widget_render", widget = "Basic").entered();

        let mut data = data.with_defaults(&[
            ("name", json!("")),
            ("val", Value::Null),
            ("type", json!("text")),
            ("escape", json!(true)),
            ("template_vars", json!({})),
        ]);
        // `val` is the caller-facing key; `value` is the emitted attribute.
        if let Some(val) = data.remove("val")
            && !val.is_null()
        {
            data.insert("value", val);
        }
        let name = data.text_or("name", "");
        let ty = data.text_or("type", "text");
        self.set_required(&mut data, ctx, &name, &ty);
        self.set_max_length(&mut data, ctx, &name, &ty);
        self.set_step(&mut data, ctx, &name, &ty);

        let mut vars = TemplateVars::new();
        if let Some(Value::Object(extra)) = data.get("template_vars") {
            for (key, value) in extra {
                vars.insert(
                    key.clone(),
                    crate::data::scalar_text(value).unwrap_or_default(),
                );
            }
        }
        vars.insert("name".to_string(), name);
        vars.insert("type".to_string(), ty);
        vars.insert(
            "attrs".to_string(),
            self.formatter.format(
                &self.templates,
                &data.to_attrs(&["name", "type", "escape", "template_vars"]),
                &[],
            ),
        );
        Ok(self.templates.format("input", &vars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FieldMeta, MapContext, NullContext};
    use crate::default_templates;

    fn widget() -> BasicWidget {
        BasicWidget::new(Arc::new(default_templates()), AttributeFormatter::new())
    }

    #[test]
    fn renders_text_input_with_value() {
        let data = DataBag::from(json!({"name": "title", "val": "Hi"}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert_eq!(html, "<input type=\"text\" name=\"title\" value=\"Hi\">");
    }

    #[test]
    fn derives_required_from_context() {
        let ctx = MapContext::new().field("title", FieldMeta::new().required(true));
        let data = DataBag::from(json!({"name": "title"}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(html.contains("required=\"required\""));
    }

    #[test]
    fn caller_required_wins_over_context() {
        let ctx = MapContext::new().field("title", FieldMeta::new().required(true));
        let data = DataBag::from(json!({"name": "title", "required": false}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(!html.contains("required"));
    }

    #[test]
    fn disabled_field_skips_required() {
        let ctx = MapContext::new().field("title", FieldMeta::new().required(true));
        let data = DataBag::from(json!({"name": "title", "disabled": true}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(html.contains("disabled=\"disabled\""));
        assert!(!html.contains("required"));
    }

    #[test]
    fn derives_capped_maxlength_for_text_types() {
        let ctx = MapContext::new().field("bio", FieldMeta::new().max_length(1_000_000));
        let data = DataBag::from(json!({"name": "bio"}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(html.contains("maxlength=\"100000\""));
    }

    #[test]
    fn no_maxlength_for_number_type() {
        let ctx = MapContext::new().field("n", FieldMeta::new().max_length(10));
        let data = DataBag::from(json!({"name": "n", "type": "number"}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(!html.contains("maxlength"));
    }

    #[test]
    fn derives_step_from_precision() {
        let ctx = MapContext::new().field(
            "price",
            FieldMeta::new()
                .field_type("decimal")
                .attribute("precision", json!(2)),
        );
        let data = DataBag::from(json!({"name": "price", "type": "number"}));
        let html = widget().render(&data, &ctx).unwrap();
        assert!(html.contains("step=\"0.01\""));
    }

    #[test]
    fn template_vars_reach_custom_templates() {
        let mut templates = default_templates();
        templates.add([("input", "<input type=\"{{type}}\" name=\"{{name}}\" data-x=\"{{custom}}\"{{attrs}}>")]);
        let w = BasicWidget::new(Arc::new(templates), AttributeFormatter::new());
        let data = DataBag::from(json!({"name": "a", "template_vars": {"custom": "y"}}));
        let html = w.render(&data, &NullContext).unwrap();
        assert!(html.contains("data-x=\"y\""));
    }
}

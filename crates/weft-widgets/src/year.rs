#![forbid(unsafe_code)]

//! Year selection widget.
//!
//! Derives a bounded year range (default today ±5 years, widened to include
//! an explicitly supplied current value) and delegates rendering to the
//! injected select box widget, the widget-depends-on-widget composition
//! the locator exists to support.

use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use chrono::{Datelike, Utc};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Half-width of the default year window around the current year.
const DEFAULT_SPAN: i32 = 5;

pub struct YearWidget {
    select: Arc<dyn Widget>,
}

impl YearWidget {
    pub fn new(select: Arc<dyn Widget>) -> Self {
        Self { select }
    }
}

impl Widget for YearWidget {
    fn render(&self, data: &DataBag, ctx: &dyn FormContext) -> Result<String, WidgetError> {
        let mut data = data.with_defaults(&[
            ("name", json!("")),
            ("val", Value::Null),
            ("min", Value::Null),
            ("max", Value::Null),
        ]);
        let this_year = Utc::now().year();
        let mut min = match data.remove("min").as_ref().and_then(Value::as_i64) {
            Some(n) => n as i32,
            None => this_year - DEFAULT_SPAN,
        };
        let mut max = match data.remove("max").as_ref().and_then(Value::as_i64) {
            Some(n) => n as i32,
            None => this_year + DEFAULT_SPAN,
        };
        if max < min {
            return Err(WidgetError::InvalidRange { min, max });
        }
        // Widen the window so an out-of-range current value stays selectable.
        if let Some(val) = data.get("val").and_then(|v| v.as_i64()) {
            let val = val as i32;
            min = min.min(val);
            max = max.max(val);
        }

        let mut options = Map::new();
        for year in (min..=max).rev() {
            options.insert(year.to_string(), json!(year.to_string()));
        }
        data.insert("options", Value::Object(options));
        self.select.render(&data, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::default_templates;
    use crate::select_box::SelectBoxWidget;
    use weft_template::AttributeFormatter;

    fn widget() -> YearWidget {
        let select = Arc::new(SelectBoxWidget::new(
            Arc::new(default_templates()),
            AttributeFormatter::new(),
        ));
        YearWidget::new(select)
    }

    #[test]
    fn default_window_spans_five_years_each_way() {
        let this_year = Utc::now().year();
        let data = DataBag::from(json!({"name": "y"}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains(&format!("value=\"{}\"", this_year - 5)));
        assert!(html.contains(&format!("value=\"{}\"", this_year + 5)));
        assert!(!html.contains(&format!("value=\"{}\"", this_year + 6)));
    }

    #[test]
    fn out_of_range_value_widens_a_boundary() {
        let data = DataBag::from(json!({"name": "y", "min": 2020, "max": 2025, "val": 2031}));
        let html = widget().render(&data, &NullContext).unwrap();
        assert!(html.contains("<option value=\"2031\" selected=\"selected\">2031</option>"));
        // Descending order: the widened boundary renders first.
        assert!(html.starts_with("<select name=\"y\"><option value=\"2031\""));
    }

    #[test]
    fn inverted_range_is_fatal() {
        let data = DataBag::from(json!({"name": "y", "min": 2025, "max": 2020}));
        assert!(matches!(
            widget().render(&data, &NullContext),
            Err(WidgetError::InvalidRange { .. })
        ));
    }

    #[test]
    fn years_render_descending() {
        let data = DataBag::from(json!({"name": "y", "min": 2023, "max": 2025}));
        let html = widget().render(&data, &NullContext).unwrap();
        let p25 = html.find("value=\"2025\"").unwrap();
        let p23 = html.find("value=\"2023\"").unwrap();
        assert!(p25 < p23);
    }
}

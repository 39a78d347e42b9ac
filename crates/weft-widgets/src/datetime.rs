#![forbid(unsafe_code)]

//! Temporal input widget.
//!
//! Normalizes heterogeneous caller values (unix timestamps, formatted
//! strings, empty) into a canonical [`NaiveDateTime`], optionally converts
//! to a fixed-offset timezone, and formats per the HTML input `type`.

use crate::context::FormContext;
use crate::data::DataBag;
use crate::{Widget, WidgetError};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use weft_template::{AttributeFormatter, StringTemplate, TemplateVars};

/// Output format per supported HTML input type.
const FORMATS: &[(&str, &str)] = &[
    ("date", "%Y-%m-%d"),
    ("time", "%H:%M:%S"),
    ("datetime-local", "%Y-%m-%dT%H:%M:%S"),
    ("month", "%Y-%m"),
    ("week", "%G-W%V"),
];

/// String shapes accepted for temporal values.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone)]
pub struct DateTimeWidget {
    templates: Arc<StringTemplate>,
    formatter: AttributeFormatter,
}

impl DateTimeWidget {
    pub fn new(templates: Arc<StringTemplate>, formatter: AttributeFormatter) -> Self {
        Self {
            templates,
            formatter,
        }
    }

    fn normalize(val: &Value) -> Result<Option<NaiveDateTime>, WidgetError> {
        match val {
            Value::Null => Ok(None),
            Value::Number(n) => {
                let secs = n.as_i64().ok_or_else(|| WidgetError::InvalidValue {
                    detail: format!("timestamp '{n}' is out of range"),
                })?;
                DateTime::from_timestamp(secs, 0)
                    .map(|dt| Some(dt.naive_utc()))
                    .ok_or_else(|| WidgetError::InvalidValue {
                        detail: format!("timestamp '{secs}' is out of range"),
                    })
            }
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => parse_datetime(s)
                .map(Some)
                .ok_or_else(|| WidgetError::InvalidValue {
                    detail: format!("cannot interpret '{s}' as a date or time"),
                }),
            other => Err(WidgetError::InvalidValue {
                detail: format!("cannot interpret '{other}' as a date or time"),
            }),
        }
    }

    fn convert(moment: NaiveDateTime, timezone: Option<&str>) -> Result<NaiveDateTime, WidgetError> {
        let Some(tz) = timezone else {
            return Ok(moment);
        };
        let offset = parse_offset(tz).ok_or_else(|| WidgetError::InvalidValue {
            detail: format!("invalid timezone offset '{tz}'"),
        })?;
        let utc = Utc.from_utc_datetime(&moment);
        Ok(utc.with_timezone(&offset).naive_local())
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time));
    }
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    None
}

/// Parse `+HH:MM` / `-HH:MM` into a fixed offset.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Widget for DateTimeWidget {
    fn render(&self, data: &DataBag, _ctx: &dyn FormContext) -> Result<String, WidgetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("widget_render", widget = "DateTime").entered();

        let mut data = data.with_defaults(&[
            ("name", json!("")),
            ("val", Value::Null),
            ("type", json!("datetime-local")),
            ("timezone", Value::Null),
        ]);
        let ty = data.text_or("type", "datetime-local");
        let format = FORMATS
            .iter()
            .find(|(name, _)| *name == ty)
            .map(|(_, format)| *format)
            .ok_or_else(|| WidgetError::InvalidType {
                type_name: ty.clone(),
            })?;

        let timezone = data.text("timezone");
        let val = data.remove("val").unwrap_or(Value::Null);
        let value = match Self::normalize(&val)? {
            Some(moment) => Self::convert(moment, timezone.as_deref())?
                .format(format)
                .to_string(),
            None => String::new(),
        };
        if !value.is_empty() {
            data.insert("value", json!(value));
        }
        data.remove("timezone");

        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), data.text_or("name", ""));
        vars.insert("type".to_string(), ty);
        vars.insert(
            "attrs".to_string(),
            self.formatter
                .format(&self.templates, &data.to_attrs(&["name", "type"]), &[]),
        );
        Ok(self.templates.format("input", &vars)?)
    }
}

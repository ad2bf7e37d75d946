// Time and sensor value formatting
use crate::domain::room::SensorValue;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn format_time(timestamp: Option<&str>) -> String {
    format_time_in(timestamp, &Local)
}

/// Renders a backend timestamp in `tz`. Timestamps without an offset are
/// already local and are only reformatted; anything unparseable is returned
/// as given.
pub fn format_time_in<Tz>(timestamp: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(timestamp) = timestamp.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed
            .with_timezone(tz)
            .format(DISPLAY_FORMAT)
            .to_string();
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
        .map(|naive| naive.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn format_value(value: Option<&SensorValue>) -> String {
    match value {
        None => String::new(),
        Some(SensorValue::Number(number)) => format!("{number:.2}"),
        Some(SensorValue::Flag(flag)) => flag.to_string(),
        Some(SensorValue::Text(text)) => text.clone(),
    }
}

// Room and sensor reading domain models
use super::reported::string_or_number;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of history entries shown in the room detail
pub const RECENT_READINGS: usize = 10;

/// A raw sensor value. Simulators emit 0/1 for smoke and motion while
/// older fixtures use booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SensorValue {
    /// Truthiness as the dashboard reads it: true, any non-zero number,
    /// or a non-empty string
    pub fn is_set(&self) -> bool {
        match self {
            SensorValue::Flag(flag) => *flag,
            SensorValue::Number(value) => *value != 0.0,
            SensorValue::Text(text) => !text.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub value: Option<SensorValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(deserialize_with = "string_or_number")]
    pub room_id: String,
    #[serde(default)]
    pub apartment_id: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub latest_readings: HashMap<String, LatestReading>,
}

impl Room {
    /// "3B - Living Room", falling back to the id when unnamed or blank
    pub fn display_name(&self) -> String {
        let name = self
            .room_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.room_id);
        format!("{} - {}", self.apartment_id.as_deref().unwrap_or(""), name)
    }

    /// Timestamp of the latest temperature reading, shown as "last update"
    pub fn last_update(&self) -> Option<&str> {
        self.latest_readings
            .get("temperature")
            .and_then(|reading| reading.timestamp.as_deref())
    }

    /// Case-insensitive substring match across apartment, name and id
    pub fn matches(&self, query: &str) -> bool {
        let text = format!(
            "{} {} {}",
            self.apartment_id.as_deref().unwrap_or(""),
            self.room_name.as_deref().unwrap_or(""),
            self.room_id
        );
        text.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub temperature: Option<SensorValue>,
    #[serde(default)]
    pub smoke: Option<SensorValue>,
    #[serde(default)]
    pub noise: Option<SensorValue>,
    #[serde(default)]
    pub motion: Option<SensorValue>,
}

impl Reading {
    pub fn motion_detected(&self) -> bool {
        self.motion.as_ref().is_some_and(SensorValue::is_set)
    }
}

/// Time-ordered reading history as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomHistory {
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl RoomHistory {
    pub fn latest(&self) -> Reading {
        self.readings.last().cloned().unwrap_or_default()
    }

    /// Last entries in backend order, not re-sorted
    pub fn recent(&self) -> &[Reading] {
        let start = self.readings.len().saturating_sub(RECENT_READINGS);
        &self.readings[start..]
    }
}

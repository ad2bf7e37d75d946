// Safety alert domain model
use super::action::RowAction;
use super::filter::{parse_choice, unknown_control, FilterControls, FilterError, UnknownValue};
use super::reported::{string_or_number, Reported};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl FromStr for Severity {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(UnknownValue::new("severity", s)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    // The alert engine writes fresh alerts as "new"
    #[serde(alias = "new")]
    Open,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "open",
            AlertStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "new" => Ok(AlertStatus::Open),
            "resolved" => Ok(AlertStatus::Resolved),
            _ => Err(UnknownValue::new("alert status", s)),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "string_or_number")]
    pub alert_id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub severity: Option<Reported<Severity>>,
    #[serde(default)]
    pub apartment_id: Option<String>,
    #[serde(default, alias = "room")]
    pub room_id: Option<String>,
    #[serde(default)]
    pub status: Reported<AlertStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Alert {
    /// "3B Room 403" style location label
    pub fn location(&self) -> String {
        format!(
            "{} {}",
            self.apartment_id.as_deref().unwrap_or(""),
            self.room_id.as_deref().unwrap_or("")
        )
    }

    /// Resolving is one-way; there is no path back to open. Statuses the
    /// console does not know offer nothing.
    pub fn actions(&self) -> Vec<RowAction> {
        match self.status {
            Reported::Known(AlertStatus::Open) => vec![RowAction::Resolve],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        if let Some(severity) = self.severity {
            if !alert.severity.as_ref().is_some_and(|s| s.is(severity)) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if !alert.status.is(status) {
                return false;
            }
        }
        true
    }
}

impl FilterControls for AlertFilter {
    fn controls() -> &'static [&'static str] {
        &["severity", "status"]
    }

    fn apply(&mut self, control: &str, value: &str) -> Result<(), FilterError> {
        match control {
            "severity" => self.severity = parse_choice(value)?,
            "status" => self.status = parse_choice(value)?,
            _ => return Err(unknown_control::<Self>(control)),
        }
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(severity) = self.severity {
            pairs.push(("severity", severity.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

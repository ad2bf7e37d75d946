// Maintenance request domain model
use super::action::RowAction;
use super::filter::{parse_choice, unknown_control, FilterControls, FilterError, UnknownValue};
use super::reported::{string_or_number, Reported};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Resolved,
}

impl MaintenanceStatus {
    pub const ALL: [MaintenanceStatus; 3] = [
        MaintenanceStatus::Pending,
        MaintenanceStatus::InProgress,
        MaintenanceStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Resolved => "resolved",
        }
    }

    /// Option text in the status selector
    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "Pending",
            MaintenanceStatus::InProgress => "In Progress",
            MaintenanceStatus::Resolved => "Resolved",
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(MaintenanceStatus::Pending),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "resolved" => Ok(MaintenanceStatus::Resolved),
            _ => Err(UnknownValue::new("maintenance status", s)),
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    #[serde(default)]
    pub apartment_id: Option<String>,
    #[serde(default)]
    pub resident_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Reported<MaintenanceStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl MaintenanceRequest {
    pub fn is_open(&self) -> bool {
        !self.status.is(MaintenanceStatus::Resolved)
    }

    /// Status is freely re-selectable in both directions, also away from
    /// a value the console does not know.
    pub fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::SetStatus]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceFilter {
    pub status: Option<MaintenanceStatus>,
}

impl MaintenanceFilter {
    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        self.status.is_none_or(|status| request.status.is(status))
    }
}

impl FilterControls for MaintenanceFilter {
    fn controls() -> &'static [&'static str] {
        &["status"]
    }

    fn apply(&mut self, control: &str, value: &str) -> Result<(), FilterError> {
        match control {
            "status" => self.status = parse_choice(value)?,
            _ => return Err(unknown_control::<Self>(control)),
        }
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default()
    }
}

// Package delivery domain model
use super::action::RowAction;
use super::filter::{parse_choice, unknown_control, FilterControls, FilterError, UnknownValue};
use super::reported::{string_or_number, Reported};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Intended progression is arrived -> notified -> picked_up, but pickup may
/// skip the notification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Arrived,
    Notified,
    PickedUp,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Arrived => "arrived",
            PackageStatus::Notified => "notified",
            PackageStatus::PickedUp => "picked_up",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageStatus::Arrived => "Arrived",
            PackageStatus::Notified => "Notified",
            PackageStatus::PickedUp => "Picked up",
        }
    }
}

impl FromStr for PackageStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrived" => Ok(PackageStatus::Arrived),
            "notified" => Ok(PackageStatus::Notified),
            "picked_up" => Ok(PackageStatus::PickedUp),
            _ => Err(UnknownValue::new("package status", s)),
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(deserialize_with = "string_or_number")]
    pub package_id: String,
    #[serde(default)]
    pub resident_name: Option<String>,
    #[serde(default)]
    pub apartment_id: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub status: Reported<PackageStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub arrived_at: Option<String>,
}

impl Package {
    pub fn is_unpicked(&self) -> bool {
        !self.status.is(PackageStatus::PickedUp)
    }

    /// Delete is always offered, even for a status the console does not know
    pub fn actions(&self) -> Vec<RowAction> {
        let mut actions = Vec::new();
        match self.status {
            Reported::Known(PackageStatus::Arrived) => {
                actions.extend([RowAction::Notify, RowAction::PickUp])
            }
            Reported::Known(PackageStatus::Notified) => actions.push(RowAction::PickUp),
            _ => {}
        }
        actions.push(RowAction::Delete);
        actions
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all fields.")]
pub struct IncompleteForm {
    pub missing: Vec<&'static str>,
}

/// Body of `POST /packages`, built from the new-package form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPackage {
    pub resident_id: String,
    pub carrier: String,
    pub location: String,
}

impl NewPackage {
    /// Trims every field and refuses the form if any of them ends up blank
    pub fn from_form(resident_id: &str, carrier: &str, location: &str) -> Result<Self, IncompleteForm> {
        let fields = [
            ("resident_id", resident_id.trim()),
            ("carrier", carrier.trim()),
            ("location", location.trim()),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(IncompleteForm { missing });
        }

        Ok(Self {
            resident_id: fields[0].1.to_string(),
            carrier: fields[1].1.to_string(),
            location: fields[2].1.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageFilter {
    pub status: Option<PackageStatus>,
}

impl PackageFilter {
    pub fn matches(&self, package: &Package) -> bool {
        self.status.is_none_or(|status| package.status.is(status))
    }
}

impl FilterControls for PackageFilter {
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

// Overview summary domain model
use super::alert::{Alert, AlertStatus};
use super::maintenance::MaintenanceRequest;
use super::package::Package;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

const RECENT_ITEMS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewCounts {
    #[serde(default)]
    pub alerts_total_today: Option<u64>,
    #[serde(default)]
    pub alerts_unresolved: Option<u64>,
    #[serde(default)]
    pub maintenance_open: Option<u64>,
    #[serde(default)]
    pub packages_unpicked: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub counts: OverviewCounts,
    #[serde(default)]
    pub recent_alerts: Vec<Alert>,
    #[serde(default)]
    pub recent_maintenance: Vec<MaintenanceRequest>,
}

impl Overview {
    /// Builds the summary locally from full collections, the way the backend
    /// computes it. `today` is a date in the timezone `tz`.
    pub fn summarize<Tz: TimeZone>(
        alerts: &[Alert],
        maintenance: &[MaintenanceRequest],
        packages: &[Package],
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let created_today = alerts
            .iter()
            .filter(|alert| {
                alert
                    .created_at
                    .as_deref()
                    .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                    .is_some_and(|ts| ts.with_timezone(tz).date_naive() == today)
            })
            .count();

        let counts = OverviewCounts {
            alerts_total_today: Some(created_today as u64),
            alerts_unresolved: Some(
                alerts
                    .iter()
                    .filter(|alert| alert.status.is(AlertStatus::Open))
                    .count() as u64,
            ),
            maintenance_open: Some(maintenance.iter().filter(|m| m.is_open()).count() as u64),
            packages_unpicked: Some(packages.iter().filter(|p| p.is_unpicked()).count() as u64),
        };

        Self {
            counts,
            recent_alerts: alerts.iter().rev().take(RECENT_ITEMS).cloned().collect(),
            recent_maintenance: maintenance.iter().rev().take(RECENT_ITEMS).cloned().collect(),
        }
    }

    pub fn summarize_now(
        alerts: &[Alert],
        maintenance: &[MaintenanceRequest],
        packages: &[Package],
    ) -> Self {
        Self::summarize(alerts, maintenance, packages, Local::now().date_naive(), &Local)
    }
}

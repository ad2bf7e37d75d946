// In-memory data source for running the dashboard without a backend
use crate::application::data_source::{AdminDataSource, DataSourceError, DataSourceResult};
use crate::domain::alert::{Alert, AlertFilter, AlertStatus, Severity};
use crate::domain::community::{CommunityFilter, CommunityPost, PostStatus};
use crate::domain::maintenance::{MaintenanceFilter, MaintenanceRequest, MaintenanceStatus};
use crate::domain::overview::Overview;
use crate::domain::package::{NewPackage, Package, PackageFilter, PackageStatus};
use crate::domain::room::{LatestReading, Reading, Room, RoomHistory, SensorValue};
use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub alerts: Vec<Alert>,
    pub maintenance: Vec<MaintenanceRequest>,
    pub packages: Vec<Package>,
    pub rooms: Vec<Room>,
    pub histories: HashMap<String, Vec<Reading>>,
    pub posts: Vec<CommunityPost>,
}

/// Serves and mutates collections held in process memory
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    collections: Mutex<Collections>,
}

impl InMemoryDataSource {
    pub fn new(collections: Collections) -> Self {
        Self {
            collections: Mutex::new(collections),
        }
    }

    /// Development fixtures, timestamped relative to now
    pub fn with_fixtures() -> Self {
        Self::new(fixtures())
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // Every mutation is a single assignment, so poisoned data is intact
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AdminDataSource for InMemoryDataSource {
    async fn overview(&self) -> DataSourceResult<Overview> {
        let data = self.lock();
        Ok(Overview::summarize_now(
            &data.alerts,
            &data.maintenance,
            &data.packages,
        ))
    }

    async fn list_rooms(&self) -> DataSourceResult<Vec<Room>> {
        Ok(self.lock().rooms.clone())
    }

    async fn room_history(&self, room_id: &str) -> DataSourceResult<RoomHistory> {
        let readings = self.lock().histories.get(room_id).cloned().unwrap_or_default();
        Ok(RoomHistory { readings })
    }

    async fn list_alerts(&self, filter: &AlertFilter) -> DataSourceResult<Vec<Alert>> {
        Ok(self
            .lock()
            .alerts
            .iter()
            .filter(|alert| filter.matches(alert))
            .cloned()
            .collect())
    }

    async fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> DataSourceResult<()> {
        let mut data = self.lock();
        let alert = data
            .alerts
            .iter_mut()
            .find(|alert| alert.alert_id == alert_id)
            .ok_or_else(|| DataSourceError::not_found("alert", alert_id))?;
        alert.status = status.into();
        Ok(())
    }

    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> DataSourceResult<Vec<MaintenanceRequest>> {
        Ok(self
            .lock()
            .maintenance
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    async fn update_maintenance_status(
        &self,
        request_id: &str,
        status: MaintenanceStatus,
    ) -> DataSourceResult<()> {
        let mut data = self.lock();
        let request = data
            .maintenance
            .iter_mut()
            .find(|request| request.request_id == request_id)
            .ok_or_else(|| DataSourceError::not_found("maintenance request", request_id))?;
        request.status = status.into();
        Ok(())
    }

    async fn list_packages(&self, filter: &PackageFilter) -> DataSourceResult<Vec<Package>> {
        Ok(self
            .lock()
            .packages
            .iter()
            .filter(|package| filter.matches(package))
            .cloned()
            .collect())
    }

    async fn create_package(&self, package: &NewPackage) -> DataSourceResult<()> {
        let now = Utc::now();
        let created = Package {
            package_id: format!("mock-{}", now.timestamp_millis()),
            resident_name: Some(format!("Resident {}", package.resident_id)),
            apartment_id: Some(package.resident_id.clone()),
            carrier: Some(package.carrier.clone()),
            status: PackageStatus::Arrived.into(),
            location: Some(package.location.clone()),
            arrived_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        self.lock().packages.insert(0, created);
        Ok(())
    }

    async fn update_package_status(
        &self,
        package_id: &str,
        status: PackageStatus,
    ) -> DataSourceResult<()> {
        let mut data = self.lock();
        let package = data
            .packages
            .iter_mut()
            .find(|package| package.package_id == package_id)
            .ok_or_else(|| DataSourceError::not_found("package", package_id))?;
        package.status = status.into();
        Ok(())
    }

    async fn delete_package(&self, package_id: &str) -> DataSourceResult<()> {
        let mut data = self.lock();
        let index = data
            .packages
            .iter()
            .position(|package| package.package_id == package_id)
            .ok_or_else(|| DataSourceError::not_found("package", package_id))?;
        data.packages.remove(index);
        Ok(())
    }

    async fn list_posts(&self, filter: &CommunityFilter) -> DataSourceResult<Vec<CommunityPost>> {
        Ok(self
            .lock()
            .posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect())
    }

    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> DataSourceResult<()> {
        let mut data = self.lock();
        let post = data
            .posts
            .iter_mut()
            .find(|post| post.post_id == post_id)
            .ok_or_else(|| DataSourceError::not_found("post", post_id))?;
        post.status = status.into();
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> DataSourceResult<()> {
        let mut data = self.lock();
        let index = data
            .posts
            .iter()
            .position(|post| post.post_id == post_id)
            .ok_or_else(|| DataSourceError::not_found("post", post_id))?;
        data.posts.remove(index);
        Ok(())
    }
}

fn hours_ago(hours: i64) -> Option<String> {
    Some((Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn reading(hours: i64, temperature: f64, noise: f64, motion: bool) -> Reading {
    Reading {
        timestamp: hours_ago(hours),
        temperature: Some(SensorValue::Number(temperature)),
        smoke: Some(SensorValue::Number(0.0)),
        noise: Some(SensorValue::Number(noise)),
        motion: Some(SensorValue::Flag(motion)),
    }
}

fn room(id: &str, apartment: &str, name: &str, hours: i64, temperature: f64) -> Room {
    let latest = LatestReading {
        timestamp: hours_ago(hours),
        value: Some(SensorValue::Number(temperature)),
    };
    Room {
        room_id: id.to_string(),
        apartment_id: text(apartment),
        room_name: text(name),
        latest_readings: HashMap::from([("temperature".to_string(), latest)]),
    }
}

fn fixtures() -> Collections {
    let alerts = vec![
        Alert {
            alert_id: "a1".to_string(),
            kind: text("Smoke"),
            severity: Some(Severity::High.into()),
            apartment_id: text("3B"),
            room_id: text("Room 403"),
            status: AlertStatus::Open.into(),
            created_at: hours_ago(0),
        },
        Alert {
            alert_id: "a2".to_string(),
            kind: text("Door"),
            severity: Some(Severity::Medium.into()),
            apartment_id: text("2A"),
            room_id: text("Entry"),
            status: AlertStatus::Resolved.into(),
            created_at: hours_ago(1),
        },
    ];

    let maintenance = vec![
        MaintenanceRequest {
            request_id: "m1".to_string(),
            apartment_id: text("3B"),
            resident_name: text("Alice"),
            category: text("Plumbing"),
            status: MaintenanceStatus::InProgress.into(),
            created_at: hours_ago(2),
        },
        MaintenanceRequest {
            request_id: "m2".to_string(),
            apartment_id: text("5C"),
            resident_name: text("Bob"),
            category: text("Heating"),
            status: MaintenanceStatus::Pending.into(),
            created_at: hours_ago(24),
        },
    ];

    let packages = vec![
        Package {
            package_id: "p1".to_string(),
            resident_name: text("Chris"),
            apartment_id: text("2D"),
            carrier: text("UPS"),
            status: PackageStatus::Arrived.into(),
            location: text("Mailroom A"),
            arrived_at: hours_ago(3),
        },
        Package {
            package_id: "p2".to_string(),
            resident_name: text("Dana"),
            apartment_id: text("1A"),
            carrier: text("USPS"),
            status: PackageStatus::PickedUp.into(),
            location: text("Mailroom B"),
            arrived_at: hours_ago(48),
        },
    ];

    let rooms = vec![
        room("r1", "3B", "Living Room", 0, 23.3),
        room("r2", "3B", "Bedroom", 1, 21.9),
    ];

    let histories = HashMap::from([
        (
            "r1".to_string(),
            vec![
                reading(3, 22.5, 30.0, false),
                reading(2, 23.0, 35.0, true),
                reading(1, 23.3, 32.0, false),
            ],
        ),
        (
            "r2".to_string(),
            vec![reading(2, 21.3, 20.0, false), reading(1, 21.9, 22.0, false)],
        ),
    ]);

    let posts = vec![
        CommunityPost {
            post_id: "c1".to_string(),
            title: text("Free Chair"),
            resident_name: text("Alice"),
            category: text("furniture"),
            status: PostStatus::Active.into(),
            created_at: hours_ago(1),
        },
        CommunityPost {
            post_id: "c2".to_string(),
            title: text("Leftover Pizza"),
            resident_name: text("Chris"),
            category: text("food"),
            status: PostStatus::Closed.into(),
            created_at: hours_ago(3),
        },
    ];

    Collections {
        alerts,
        maintenance,
        packages,
        rooms,
        histories,
        posts,
    }
}

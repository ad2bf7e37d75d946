// Data source port for the admin backend
use crate::domain::alert::{Alert, AlertFilter, AlertStatus};
use crate::domain::community::{CommunityFilter, CommunityPost, PostStatus};
use crate::domain::maintenance::{MaintenanceFilter, MaintenanceRequest, MaintenanceStatus};
use crate::domain::overview::Overview;
use crate::domain::package::{NewPackage, Package, PackageFilter, PackageStatus};
use crate::domain::room::{Room, RoomHistory};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataSourceError {
    /// Non-success response. `message` is the `error` field of the body when
    /// the body parsed as JSON and carried one.
    #[error("request rejected with status {status}: {}", rejection_detail(.message, .body))]
    Rejected {
        status: u16,
        message: Option<String>,
        body: String,
    },
    #[error("{0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid data source configuration: {0}")]
    InvalidConfig(String),
}

fn rejection_detail<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

impl DataSourceError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        let message = format!("{kind} {id} not found");
        DataSourceError::Rejected {
            status: 404,
            body: message.clone(),
            message: Some(message),
        }
    }

    /// Text for the user-facing notification, preferring what the backend
    /// said over `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            DataSourceError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            DataSourceError::Rejected { message: None, .. } => fallback.to_string(),
            DataSourceError::Transport(message) if !message.is_empty() => message.clone(),
            DataSourceError::Transport(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Everything the dashboard reads from or writes to the backend.
/// Mutations return only once the backend has acknowledged them.
#[async_trait]
pub trait AdminDataSource: Send + Sync {
    /// Summary counts plus recent alerts and maintenance
    async fn overview(&self) -> DataSourceResult<Overview>;

    /// Rooms with their latest reading per sensor
    async fn list_rooms(&self) -> DataSourceResult<Vec<Room>>;

    /// Time-ordered reading history for one room
    async fn room_history(&self, room_id: &str) -> DataSourceResult<RoomHistory>;

    async fn list_alerts(&self, filter: &AlertFilter) -> DataSourceResult<Vec<Alert>>;

    async fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> DataSourceResult<()>;

    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> DataSourceResult<Vec<MaintenanceRequest>>;

    async fn update_maintenance_status(
        &self,
        request_id: &str,
        status: MaintenanceStatus,
    ) -> DataSourceResult<()>;

    async fn list_packages(&self, filter: &PackageFilter) -> DataSourceResult<Vec<Package>>;

    async fn create_package(&self, package: &NewPackage) -> DataSourceResult<()>;

    async fn update_package_status(
        &self,
        package_id: &str,
        status: PackageStatus,
    ) -> DataSourceResult<()>;

    async fn delete_package(&self, package_id: &str) -> DataSourceResult<()>;

    async fn list_posts(&self, filter: &CommunityFilter) -> DataSourceResult<Vec<CommunityPost>>;

    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> DataSourceResult<()>;

    async fn delete_post(&self, post_id: &str) -> DataSourceResult<()>;
}

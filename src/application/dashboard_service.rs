// Dashboard service - Load/filter/mutate/refresh cycle across all views
use crate::application::data_source::{AdminDataSource, DataSourceError, DataSourceResult};
use crate::application::overview_view::OverviewView;
use crate::application::prompt::Prompt;
use crate::application::resource_view::{
    ActionError, Alerts, Community, Maintenance, Packages, ResourceView,
};
use crate::application::rooms_view::RoomsView;
use crate::domain::action::RowAction;
use crate::domain::alert::AlertStatus;
use crate::domain::community::PostStatus;
use crate::domain::maintenance::MaintenanceStatus;
use crate::domain::package::{NewPackage, PackageStatus};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const CONFIRM_DELETE_PACKAGE: &str = "Are you sure you want to delete this package?";
pub const CONFIRM_DELETE_POST: &str = "Delete this post? This cannot be undone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Rooms,
    Alerts,
    Maintenance,
    Packages,
    Community,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Overview,
        Section::Rooms,
        Section::Alerts,
        Section::Maintenance,
        Section::Packages,
        Section::Community,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Rooms => "rooms",
            Section::Alerts => "alerts",
            Section::Maintenance => "maintenance",
            Section::Packages => "packages",
            Section::Community => "community",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Rooms => "Sensors & Rooms",
            Section::Alerts => "Alerts",
            Section::Maintenance => "Maintenance",
            Section::Packages => "Packages",
            Section::Community => "Community",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Section::Overview => "Building status at a glance",
            Section::Rooms => "Monitor room sensor readings",
            Section::Alerts => "Filter and manage safety alerts",
            Section::Maintenance => "Manage maintenance requests",
            Section::Packages => "Track deliveries and pickups",
            Section::Community => "Moderate community exchange posts",
        }
    }
}

impl FromStr for Section {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensors" => Ok(Section::Rooms),
            other => Section::ALL
                .into_iter()
                .find(|section| section.name() == other)
                .ok_or(()),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What became of a user-initiated mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Acknowledged by the backend; views were reloaded
    Applied,
    /// Backend refused or was unreachable; the user was notified
    Rejected,
    /// The user declined the confirmation
    Cancelled,
    /// The form was incomplete; nothing was sent
    Invalid,
}

pub struct Dashboard {
    source: Arc<dyn AdminDataSource>,
    section: Section,
    pub overview: OverviewView,
    pub rooms: RoomsView,
    pub alerts: ResourceView<Alerts>,
    pub maintenance: ResourceView<Maintenance>,
    pub packages: ResourceView<Packages>,
    pub community: ResourceView<Community>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn AdminDataSource>) -> Self {
        Self {
            source,
            section: Section::Overview,
            overview: OverviewView::new(),
            rooms: RoomsView::new(),
            alerts: ResourceView::new(),
            maintenance: ResourceView::new(),
            packages: ResourceView::new(),
            community: ResourceView::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Switch to a section and load it
    pub async fn navigate(&mut self, section: Section) {
        self.section = section;
        self.load(section).await;
    }

    pub async fn refresh(&mut self) {
        self.load(self.section).await;
    }

    pub async fn load(&mut self, section: Section) -> bool {
        let source = self.source.as_ref();
        match section {
            Section::Overview => self.overview.load(source).await,
            Section::Rooms => self.rooms.load(source).await,
            Section::Alerts => self.alerts.load(source).await,
            Section::Maintenance => self.maintenance.load(source).await,
            Section::Packages => self.packages.load(source).await,
            Section::Community => self.community.load(source).await,
        }
    }

    /// Change one filter control of the current section and reload it
    pub async fn apply_filter(&mut self, control: &str, value: &str) -> Result<(), ActionError> {
        match self.section {
            Section::Alerts => self.alerts.set_filter(control, value)?,
            Section::Maintenance => self.maintenance.set_filter(control, value)?,
            Section::Packages => self.packages.set_filter(control, value)?,
            Section::Community => self.community.set_filter(control, value)?,
            other => {
                return Err(ActionError::NotApplicable {
                    action: "filter",
                    view: other.name(),
                });
            }
        }
        self.refresh().await;
        Ok(())
    }

    pub fn search_rooms(&mut self, query: &str) -> Result<(), ActionError> {
        self.require(Section::Rooms, "search")?;
        self.rooms.search(query);
        Ok(())
    }

    /// Run a row action of the current section. Row numbers are 1-based.
    pub async fn trigger(
        &mut self,
        row: usize,
        action: RowAction,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome, ActionError> {
        let source = Arc::clone(&self.source);
        match (self.section, action) {
            (Section::Rooms, RowAction::Open) => {
                self.rooms.open(row, source.as_ref()).await?;
                Ok(Outcome::Applied)
            }
            (Section::Alerts, RowAction::Resolve) => {
                let id = self.alerts.bound_id(row, action)?;
                let result = source.update_alert_status(&id, AlertStatus::Resolved).await;
                Ok(self
                    .finish(Section::Alerts, result, "Failed to update alert status", prompt)
                    .await)
            }
            (Section::Packages, RowAction::Notify) => {
                self.set_package_status(row, action, PackageStatus::Notified, prompt)
                    .await
            }
            (Section::Packages, RowAction::PickUp) => {
                self.set_package_status(row, action, PackageStatus::PickedUp, prompt)
                    .await
            }
            (Section::Packages, RowAction::Delete) => {
                let id = self.packages.bound_id(row, action)?;
                if !prompt.confirm(CONFIRM_DELETE_PACKAGE).await {
                    return Ok(Outcome::Cancelled);
                }
                let result = source.delete_package(&id).await;
                Ok(self
                    .finish(Section::Packages, result, "Failed to delete package", prompt)
                    .await)
            }
            (Section::Community, RowAction::Close) => {
                let id = self.community.bound_id(row, action)?;
                let result = source.update_post_status(&id, PostStatus::Closed).await;
                Ok(self
                    .finish(Section::Community, result, "Failed to update post status", prompt)
                    .await)
            }
            (Section::Community, RowAction::Delete) => {
                let id = self.community.bound_id(row, action)?;
                if !prompt.confirm(CONFIRM_DELETE_POST).await {
                    return Ok(Outcome::Cancelled);
                }
                let result = source.delete_post(&id).await;
                Ok(self
                    .finish(Section::Community, result, "Failed to delete post", prompt)
                    .await)
            }
            (Section::Maintenance, RowAction::SetStatus) => Err(ActionError::NotApplicable {
                action: "status without a value",
                view: Section::Maintenance.name(),
            }),
            (section, action) => Err(ActionError::NotApplicable {
                action: action.label(),
                view: section.name(),
            }),
        }
    }

    /// Pick a value in a maintenance row's status selector
    pub async fn set_maintenance_status(
        &mut self,
        row: usize,
        status: MaintenanceStatus,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome, ActionError> {
        self.require(Section::Maintenance, "status")?;
        let id = self.maintenance.bound_id(row, RowAction::SetStatus)?;
        let result = self
            .source
            .update_maintenance_status(&id, status)
            .await;
        Ok(self
            .finish(
                Section::Maintenance,
                result,
                "Failed to update maintenance status",
                prompt,
            )
            .await)
    }

    /// Fill in the new-package form through the prompt and submit it
    pub async fn create_package(&mut self, prompt: &mut dyn Prompt) -> Result<Outcome, ActionError> {
        self.require(Section::Packages, "new-package")?;
        let resident_id = prompt.ask("Resident ID").await;
        let carrier = prompt.ask("Carrier").await;
        let location = prompt.ask("Location").await;

        let package = match NewPackage::from_form(&resident_id, &carrier, &location) {
            Ok(package) => package,
            Err(incomplete) => {
                tracing::debug!(missing = ?incomplete.missing, "package form incomplete");
                prompt.alert(&incomplete.to_string()).await;
                return Ok(Outcome::Invalid);
            }
        };

        let result = self.source.create_package(&package).await;
        let fallback = match &result {
            Err(DataSourceError::Rejected { status, body, .. }) => {
                let body = body.trim();
                let detail = if body.is_empty() { "Unknown error" } else { body };
                format!("Server error ({status}): {detail}")
            }
            _ => "Failed to create package".to_string(),
        };
        Ok(self.finish(Section::Packages, result, &fallback, prompt).await)
    }

    fn require(&self, section: Section, action: &'static str) -> Result<(), ActionError> {
        if self.section == section {
            Ok(())
        } else {
            Err(ActionError::NotApplicable {
                action,
                view: self.section.name(),
            })
        }
    }

    async fn set_package_status(
        &mut self,
        row: usize,
        action: RowAction,
        status: PackageStatus,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome, ActionError> {
        let id = self.packages.bound_id(row, action)?;
        let result = self.source.update_package_status(&id, status).await;
        Ok(self
            .finish(Section::Packages, result, "Failed to update package status", prompt)
            .await)
    }

    /// Reload after an acknowledged mutation, or tell the user why it failed
    /// and leave every view as it was.
    async fn finish(
        &mut self,
        section: Section,
        result: DataSourceResult<()>,
        fallback: &str,
        prompt: &mut dyn Prompt,
    ) -> Outcome {
        match result {
            Ok(()) => {
                self.reload_with_overview(section).await;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(view = section.name(), error = %e, "mutation failed");
                prompt
                    .alert(&format!("Error: {}", e.user_message(fallback)))
                    .await;
                Outcome::Rejected
            }
        }
    }

    async fn reload_with_overview(&mut self, section: Section) {
        let source = self.source.as_ref();
        match section {
            Section::Overview => {
                self.overview.load(source).await;
            }
            Section::Rooms => {
                tokio::join!(self.rooms.load(source), self.overview.load(source));
            }
            Section::Alerts => {
                tokio::join!(self.alerts.load(source), self.overview.load(source));
            }
            Section::Maintenance => {
                tokio::join!(self.maintenance.load(source), self.overview.load(source));
            }
            Section::Packages => {
                tokio::join!(self.packages.load(source), self.overview.load(source));
            }
            Section::Community => {
                tokio::join!(self.community.load(source), self.overview.load(source));
            }
        }
    }
}

// Generic resource view - one filterable collection bound to one table
use crate::application::data_source::{AdminDataSource, DataSourceResult};
use crate::domain::action::RowAction;
use crate::domain::alert::{Alert, AlertFilter};
use crate::domain::community::{CommunityFilter, CommunityPost};
use crate::domain::filter::{FilterControls, FilterError};
use crate::domain::maintenance::{MaintenanceFilter, MaintenanceRequest};
use crate::domain::package::{Package, PackageFilter};
use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("there is no row {row} in the {view} table")]
    NoSuchRow { row: usize, view: &'static str },
    #[error("'{action}' is not offered on row {row}")]
    Unavailable { row: usize, action: &'static str },
    #[error("'{action}' does not apply to the {view} view")]
    NotApplicable {
        action: &'static str,
        view: &'static str,
    },
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// An entity collection the dashboard can list and act on
pub trait Resource: Send + Sync + 'static {
    type Record: Clone + Send + Sync;
    type Filter: FilterControls;

    const NAME: &'static str;

    fn fetch<'a>(
        source: &'a dyn AdminDataSource,
        filter: &'a Self::Filter,
    ) -> BoxFuture<'a, DataSourceResult<Vec<Self::Record>>>;

    fn actions(record: &Self::Record) -> Vec<RowAction>;

    fn id(record: &Self::Record) -> &str;
}

pub struct Alerts;

impl Resource for Alerts {
    type Record = Alert;
    type Filter = AlertFilter;

    const NAME: &'static str = "alerts";

    fn fetch<'a>(
        source: &'a dyn AdminDataSource,
        filter: &'a AlertFilter,
    ) -> BoxFuture<'a, DataSourceResult<Vec<Alert>>> {
        source.list_alerts(filter)
    }

    fn actions(record: &Alert) -> Vec<RowAction> {
        record.actions()
    }

    fn id(record: &Alert) -> &str {
        &record.alert_id
    }
}

pub struct Maintenance;

impl Resource for Maintenance {
    type Record = MaintenanceRequest;
    type Filter = MaintenanceFilter;

    const NAME: &'static str = "maintenance";

    fn fetch<'a>(
        source: &'a dyn AdminDataSource,
        filter: &'a MaintenanceFilter,
    ) -> BoxFuture<'a, DataSourceResult<Vec<MaintenanceRequest>>> {
        source.list_maintenance(filter)
    }

    fn actions(record: &MaintenanceRequest) -> Vec<RowAction> {
        record.actions()
    }

    fn id(record: &MaintenanceRequest) -> &str {
        &record.request_id
    }
}

pub struct Packages;

impl Resource for Packages {
    type Record = Package;
    type Filter = PackageFilter;

    const NAME: &'static str = "packages";

    fn fetch<'a>(
        source: &'a dyn AdminDataSource,
        filter: &'a PackageFilter,
    ) -> BoxFuture<'a, DataSourceResult<Vec<Package>>> {
        source.list_packages(filter)
    }

    fn actions(record: &Package) -> Vec<RowAction> {
        record.actions()
    }

    fn id(record: &Package) -> &str {
        &record.package_id
    }
}

pub struct Community;

impl Resource for Community {
    type Record = CommunityPost;
    type Filter = CommunityFilter;

    const NAME: &'static str = "community";

    fn fetch<'a>(
        source: &'a dyn AdminDataSource,
        filter: &'a CommunityFilter,
    ) -> BoxFuture<'a, DataSourceResult<Vec<CommunityPost>>> {
        source.list_posts(filter)
    }

    fn actions(record: &CommunityPost) -> Vec<RowAction> {
        record.actions()
    }

    fn id(record: &CommunityPost) -> &str {
        &record.post_id
    }
}

/// Rendered state of one resource: the current filter and the rows of the
/// last successful load. Rows are replaced wholesale, never patched.
pub struct ResourceView<R: Resource> {
    filter: R::Filter,
    rows: Vec<R::Record>,
}

impl<R: Resource> Default for ResourceView<R> {
    fn default() -> Self {
        Self {
            filter: R::Filter::default(),
            rows: Vec::new(),
        }
    }
}

impl<R: Resource> ResourceView<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn rows(&self) -> &[R::Record] {
        &self.rows
    }

    /// Update one filter control. The caller reloads afterwards.
    pub fn set_filter(&mut self, control: &str, value: &str) -> Result<(), FilterError> {
        self.filter.apply(control, value)
    }

    /// Fetch with the current filter and replace the rows. On failure the
    /// previous rows stay in place and the error is only logged.
    pub async fn load(&mut self, source: &dyn AdminDataSource) -> bool {
        match R::fetch(source, &self.filter).await {
            Ok(rows) => {
                tracing::debug!(view = R::NAME, rows = rows.len(), "view loaded");
                self.rows = rows;
                true
            }
            Err(e) => {
                tracing::error!(view = R::NAME, error = %e, "failed to load view");
                false
            }
        }
    }

    /// Record behind a 1-based row number, provided it offers `action`
    pub fn bound(&self, row: usize, action: RowAction) -> Result<&R::Record, ActionError> {
        let record = row
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .ok_or(ActionError::NoSuchRow { row, view: R::NAME })?;

        if !R::actions(record).contains(&action) {
            return Err(ActionError::Unavailable {
                row,
                action: action.label(),
            });
        }
        Ok(record)
    }

    /// Id of the record behind a bound row action
    pub fn bound_id(&self, row: usize, action: RowAction) -> Result<String, ActionError> {
        self.bound(row, action).map(|record| R::id(record).to_string())
    }
}

// Overview view - summary counters and recent activity
use crate::application::data_source::AdminDataSource;
use crate::domain::overview::Overview;

#[derive(Debug, Default)]
pub struct OverviewView {
    overview: Option<Overview>,
}

impl OverviewView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully loaded summary, if any
    pub fn overview(&self) -> Option<&Overview> {
        self.overview.as_ref()
    }

    pub async fn load(&mut self, source: &dyn AdminDataSource) -> bool {
        match source.overview().await {
            Ok(overview) => {
                self.overview = Some(overview);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load overview");
                false
            }
        }
    }
}

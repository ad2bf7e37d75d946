// Main entry point - Dependency injection and console setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::Dashboard;
use crate::application::data_source::AdminDataSource;
use crate::infrastructure::config::{load_admin_config, DataSourceKind};
use crate::infrastructure::http_data_source::HttpDataSource;
use crate::infrastructure::memory_data_source::InMemoryDataSource;
use crate::infrastructure::session::SessionStore;
use crate::presentation::badge::Palette;
use crate::presentation::console::{Console, Terminal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered tables
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_admin_config().context("loading admin configuration")?;

    // Create data source (infrastructure layer)
    let source: Arc<dyn AdminDataSource> = match config.data_source {
        DataSourceKind::Http => {
            tracing::info!(base_url = %config.backend.base_url, "using admin backend");
            let client =
                HttpDataSource::new(&config.backend).context("building backend client")?;
            Arc::new(client)
        }
        DataSourceKind::Memory => {
            tracing::info!("using in-memory fixtures");
            Arc::new(InMemoryDataSource::with_fixtures())
        }
    };

    let session = SessionStore::new(&config.session);
    match session.role().context("reading stored admin role")? {
        Some(role) => tracing::info!(%role, "signed in"),
        None => tracing::warn!("no stored admin role; the backend may refuse requests"),
    }

    // Create dashboard (application layer) and console (presentation layer)
    let dashboard = Dashboard::new(source);
    let terminal = Terminal::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    let palette = if config.display.color && std::io::stdout().is_terminal() {
        Palette::Ansi
    } else {
        Palette::Plain
    };
    let mut console = Console::new(dashboard, session, terminal).with_palette(palette);

    console.run().await
}

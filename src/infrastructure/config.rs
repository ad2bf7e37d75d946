use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config/admin";
const ENV_PREFIX: &str = "ADMIN";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Http,
    /// Built-in fixtures, no backend needed
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub data_source: DataSourceKind,
    pub backend: BackendSettings,
    pub session: SessionSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// Sent as the Cookie header on every request
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub role_file: PathBuf,
    pub login_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    /// Colour badges when stdout is a terminal
    pub color: bool,
}

pub fn load_admin_config() -> anyhow::Result<AdminConfig> {
    load_admin_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Defaults, overridden by the file at `path` (if present), overridden by
/// `ADMIN__*` environment variables
pub fn load_admin_config_from(path: &Path) -> anyhow::Result<AdminConfig> {
    let settings = config::Config::builder()
        .set_default("data_source", "http")?
        .set_default("backend.base_url", "http://127.0.0.1:5001")?
        .set_default("backend.timeout_secs", 10)?
        .set_default("session.role_file", ".admin-role")?
        .set_default("session.login_url", "login.html")?
        .set_default("display.color", true)?
        .add_source(config::File::with_name(&path.to_string_lossy()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

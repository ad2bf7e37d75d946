// Locally stored admin session marker
use crate::infrastructure::config::SessionSettings;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::PathBuf;

/// The role identifier kept on disk between runs. Signing out only clears
/// it; the backend is not contacted.
#[derive(Debug, Clone)]
pub struct SessionStore {
    role_file: PathBuf,
    login_url: String,
}

impl SessionStore {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            role_file: settings.role_file.clone(),
            login_url: settings.login_url.clone(),
        }
    }

    pub fn role(&self) -> anyhow::Result<Option<String>> {
        match std::fs::read_to_string(&self.role_file) {
            Ok(contents) => {
                let role = contents.trim();
                Ok((!role.is_empty()).then(|| role.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("reading role from {}", self.role_file.display())),
        }
    }

    /// Forget the stored role and return where the user signs in again
    pub fn logout(&self) -> anyhow::Result<&str> {
        match std::fs::remove_file(&self.role_file) {
            Ok(()) => tracing::debug!(path = %self.role_file.display(), "role cleared"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("removing {}", self.role_file.display()));
            }
        }
        Ok(&self.login_url)
    }
}

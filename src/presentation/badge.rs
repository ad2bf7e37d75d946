// Status and severity badges
use crate::domain::alert::{AlertStatus, Severity};
use crate::domain::community::PostStatus;
use crate::domain::maintenance::MaintenanceStatus;
use crate::domain::package::PackageStatus;
use crate::domain::reported::Reported;
use std::fmt;

pub const CLASS_OPEN: &str = "badge-status-open";
pub const CLASS_RESOLVED: &str = "badge-status-resolved";
pub const CLASS_IGNORED: &str = "badge-status-ignored";

/// Short label plus the style class it is drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub class: &'static str,
}

impl Badge {
    fn new(text: impl Into<String>, class: &'static str) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.text)
    }
}

/// How badge classes reach the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Plain,
    /// SGR colour per class
    Ansi,
}

impl Palette {
    pub fn paint(&self, class: &str, text: &str) -> String {
        match (self, colour_code(class)) {
            (Palette::Ansi, Some(code)) => format!("\x1b[{code}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }
}

fn colour_code(class: &str) -> Option<&'static str> {
    match class {
        "high" => Some("31"),
        "medium" | CLASS_OPEN => Some("33"),
        "low" => Some("36"),
        CLASS_RESOLVED => Some("32"),
        CLASS_IGNORED => Some("90"),
        _ => None,
    }
}

/// Values the console does not know are shown lower-cased with no class
fn unknown(raw: &str) -> Option<Badge> {
    let text = raw.trim().to_lowercase();
    (!text.is_empty()).then(|| Badge::new(text, ""))
}

pub fn severity(severity: &Reported<Severity>) -> Option<Badge> {
    match severity {
        Reported::Known(severity) => Some(Badge::new(severity.as_str(), severity.as_str())),
        Reported::Other(raw) => unknown(raw),
    }
}

pub fn alert_status(status: &Reported<AlertStatus>) -> Option<Badge> {
    match status {
        Reported::Known(AlertStatus::Open) => Some(Badge::new("open", CLASS_OPEN)),
        Reported::Known(AlertStatus::Resolved) => Some(Badge::new("resolved", CLASS_RESOLVED)),
        Reported::Other(raw) => unknown(raw).map(|badge| {
            let class = if badge.text == "ignored" { CLASS_IGNORED } else { "" };
            Badge::new(badge.text, class)
        }),
    }
}

pub fn maintenance_status(status: &Reported<MaintenanceStatus>) -> Option<Badge> {
    let status = match status {
        Reported::Known(status) => *status,
        Reported::Other(raw) => return unknown(raw),
    };
    let class = match status {
        MaintenanceStatus::Pending => CLASS_OPEN,
        MaintenanceStatus::InProgress => CLASS_IGNORED,
        MaintenanceStatus::Resolved => CLASS_RESOLVED,
    };
    Some(Badge::new(status.as_str(), class))
}

/// Package badges carry no status class
pub fn package_status(status: &Reported<PackageStatus>) -> Option<Badge> {
    match status {
        Reported::Known(status) => Some(Badge::new(status.label(), "")),
        Reported::Other(raw) => unknown(raw),
    }
}

/// Anything other than active reads as closed
pub fn post_status(status: &Reported<PostStatus>) -> Option<Badge> {
    match status {
        Reported::Known(PostStatus::Active) => Some(Badge::new("Active", CLASS_OPEN)),
        Reported::Other(raw) if raw.trim().is_empty() => None,
        _ => Some(Badge::new("Closed", CLASS_IGNORED)),
    }
}

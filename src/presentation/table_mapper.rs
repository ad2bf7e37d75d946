// Maps domain records to text tables
use crate::domain::action::RowAction;
use crate::domain::alert::Alert;
use crate::domain::community::CommunityPost;
use crate::domain::maintenance::{MaintenanceRequest, MaintenanceStatus};
use crate::domain::overview::OverviewCounts;
use crate::domain::package::Package;
use crate::domain::reported::Reported;
use crate::domain::room::{Reading, Room};
use crate::presentation::badge::{self, Badge, Palette};
use crate::presentation::format::{format_time, format_value};
use std::fmt::{self, Write};

const MISSING_COUNT: &str = "--";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Badge(Badge),
    Actions(Vec<RowAction>),
}

impl Cell {
    fn text(value: Option<&String>) -> Self {
        Cell::Text(value.cloned().unwrap_or_default())
    }

    fn time(value: Option<&String>) -> Self {
        Cell::Text(format_time(value.map(String::as_str)))
    }

    fn badge(badge: Option<Badge>) -> Self {
        badge.map_or_else(|| Cell::Text(String::new()), Cell::Badge)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Badge(badge) => write!(f, "{badge}"),
            Cell::Actions(actions) => {
                let labels: Vec<&str> = actions.iter().map(RowAction::label).collect();
                f.write_str(&labels.join(" | "))
            }
        }
    }
}

/// A rendered table. Numbered tables prefix each row with the 1-based
/// number that row commands refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
    numbered: bool,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
            numbered: false,
        }
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[cfg(test)]
    pub fn render(&self) -> String {
        self.render_with(Palette::Plain)
    }

    /// Aligned text. Badge classes are painted after padding so colour
    /// codes never count towards column widths.
    pub fn render_with(&self, palette: Palette) -> String {
        let mut header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        let mut lines: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect();
        let mut classes: Vec<Vec<Option<&'static str>>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Badge(badge) => Some(badge.class),
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        if self.numbered {
            header.insert(0, "#".to_string());
            for (index, (line, classes)) in lines.iter_mut().zip(&mut classes).enumerate() {
                line.insert(0, (index + 1).to_string());
                classes.insert(0, None);
            }
        }

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for line in &lines {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &header, &[], &widths, palette);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &[], &widths, palette);
        for (line, classes) in lines.iter().zip(&classes) {
            push_line(&mut out, line, classes, &widths, palette);
        }
        if lines.is_empty() {
            out.push_str("(no rows)\n");
        }
        out
    }
}

fn push_line(
    out: &mut String,
    cells: &[String],
    classes: &[Option<&'static str>],
    widths: &[usize],
    palette: Palette,
) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let padding = width.saturating_sub(cell.chars().count()) + 2;
        match classes.get(index).copied().flatten() {
            Some(class) => line.push_str(&palette.paint(class, cell)),
            None => line.push_str(cell),
        }
        let _ = write!(line, "{:padding$}", "");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn alert_table(alerts: &[Alert]) -> Table {
    let mut table =
        Table::new(&["Type", "Severity", "Location", "Created", "Status", "Actions"]).numbered();
    for alert in alerts {
        let mut row = alert_cells(alert);
        row.push(Cell::Actions(alert.actions()));
        table.push(row);
    }
    table
}

pub fn recent_alert_table(alerts: &[Alert]) -> Table {
    let mut table = Table::new(&["Type", "Severity", "Location", "Created", "Status"]);
    for alert in alerts {
        table.push(alert_cells(alert));
    }
    table
}

fn alert_cells(alert: &Alert) -> Vec<Cell> {
    vec![
        Cell::text(alert.kind.as_ref()),
        Cell::badge(alert.severity.as_ref().and_then(badge::severity)),
        Cell::Text(alert.location()),
        Cell::time(alert.created_at.as_ref()),
        Cell::badge(badge::alert_status(&alert.status)),
    ]
}

pub fn maintenance_table(requests: &[MaintenanceRequest]) -> Table {
    let mut table =
        Table::new(&["Apartment", "Resident", "Category", "Status", "Created", "Actions"])
            .numbered();
    for request in requests {
        table.push(vec![
            Cell::text(request.apartment_id.as_ref()),
            Cell::text(request.resident_name.as_ref()),
            Cell::text(request.category.as_ref()),
            Cell::badge(badge::maintenance_status(&request.status)),
            Cell::time(request.created_at.as_ref()),
            Cell::Text(status_selector(&request.status)),
        ]);
    }
    table
}

/// Options of a maintenance row's status selector, current one in brackets.
/// An unlisted current status marks none of them.
fn status_selector(current: &Reported<MaintenanceStatus>) -> String {
    let options: Vec<String> = MaintenanceStatus::ALL
        .iter()
        .map(|status| {
            if current.is(*status) {
                format!("({})", status.label())
            } else {
                status.label().to_string()
            }
        })
        .collect();
    options.join(" ")
}

pub fn recent_maintenance_table(requests: &[MaintenanceRequest]) -> Table {
    let mut table = Table::new(&["Apartment", "Category", "Status", "Created"]);
    for request in requests {
        table.push(vec![
            Cell::text(request.apartment_id.as_ref()),
            Cell::text(request.category.as_ref()),
            Cell::badge(badge::maintenance_status(&request.status)),
            Cell::time(request.created_at.as_ref()),
        ]);
    }
    table
}

pub fn package_table(packages: &[Package]) -> Table {
    let mut table = Table::new(&[
        "Resident", "Apartment", "Carrier", "Status", "Location", "Arrived", "Actions",
    ])
    .numbered();
    for package in packages {
        table.push(vec![
            Cell::text(package.resident_name.as_ref()),
            Cell::text(package.apartment_id.as_ref()),
            Cell::text(package.carrier.as_ref()),
            Cell::badge(badge::package_status(&package.status)),
            Cell::text(package.location.as_ref()),
            Cell::time(package.arrived_at.as_ref()),
            Cell::Actions(package.actions()),
        ]);
    }
    table
}

pub fn post_table(posts: &[CommunityPost]) -> Table {
    let mut table =
        Table::new(&["Title", "Resident", "Category", "Status", "Created", "Actions"]).numbered();
    for post in posts {
        table.push(vec![
            Cell::text(post.title.as_ref()),
            Cell::text(post.resident_name.as_ref()),
            Cell::text(post.category.as_ref()),
            Cell::badge(badge::post_status(&post.status)),
            Cell::time(post.created_at.as_ref()),
            Cell::Actions(post.actions()),
        ]);
    }
    table
}

pub fn room_list_table(rooms: &[&Room]) -> Table {
    let mut table = Table::new(&["Room", "Last update"]).numbered();
    for room in rooms {
        table.push(vec![
            Cell::Text(room.display_name()),
            Cell::Text(format_time(room.last_update())),
        ]);
    }
    table
}

pub fn latest_reading_table(latest: &Reading) -> Table {
    let motion = if latest.motion_detected() { "Detected" } else { "None" };
    let mut table = Table::new(&["Sensor", "Value"]);
    table.push(vec![
        Cell::Text("Temperature".into()),
        Cell::Text(format!("{} °C", format_value(latest.temperature.as_ref()))),
    ]);
    table.push(vec![
        Cell::Text("Smoke".into()),
        Cell::Text(format_value(latest.smoke.as_ref())),
    ]);
    table.push(vec![
        Cell::Text("Noise".into()),
        Cell::Text(format!("{} dB", format_value(latest.noise.as_ref()))),
    ]);
    table.push(vec![Cell::Text("Motion".into()), Cell::Text(motion.into())]);
    table
}

pub fn history_table(readings: &[Reading]) -> Table {
    let mut table = Table::new(&["Time", "Temp", "Smoke", "Noise", "Motion"]);
    for reading in readings {
        let motion = if reading.motion_detected() { "Yes" } else { "No" };
        table.push(vec![
            Cell::Text(format_time(reading.timestamp.as_deref())),
            Cell::Text(format_value(reading.temperature.as_ref())),
            Cell::Text(format_value(reading.smoke.as_ref())),
            Cell::Text(format_value(reading.noise.as_ref())),
            Cell::Text(motion.into()),
        ]);
    }
    table
}

/// The four overview counters, `--` where the backend gave none
pub fn counts_table(counts: &OverviewCounts) -> Table {
    let show = |count: Option<u64>| {
        Cell::Text(count.map_or_else(|| MISSING_COUNT.to_string(), |n| n.to_string()))
    };
    let mut table = Table::new(&["Metric", "Count"]);
    table.push(vec![Cell::Text("Alerts today".into()), show(counts.alerts_total_today)]);
    table.push(vec![Cell::Text("Unresolved alerts".into()), show(counts.alerts_unresolved)]);
    table.push(vec![Cell::Text("Open maintenance".into()), show(counts.maintenance_open)]);
    table.push(vec![Cell::Text("Packages waiting".into()), show(counts.packages_unpicked)]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertStatus, Severity};
    use crate::domain::package::PackageStatus;
    use crate::domain::room::SensorValue;

    fn alert(id: &str, status: AlertStatus) -> Alert {
        Alert {
            alert_id: id.to_string(),
            kind: Some("Smoke".into()),
            severity: Some(Severity::High.into()),
            apartment_id: Some("3B".into()),
            room_id: Some("Room 403".into()),
            status: status.into(),
            created_at: Some("not a time".into()),
        }
    }

    #[test]
    fn test_alert_rows_carry_actions() {
        let table = alert_table(&[alert("a1", AlertStatus::Open), alert("a2", AlertStatus::Resolved)]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0][5], Cell::Actions(vec![RowAction::Resolve]));
        assert_eq!(table.rows()[1][5], Cell::Actions(vec![]));
        assert_eq!(table.rows()[0][3], Cell::Text("not a time".into()));
    }

    #[test]
    fn test_render_aligns_and_numbers() {
        let rendered = recent_alert_table(&[alert("a1", AlertStatus::Open)]).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Type   Severity  Location"));
        assert!(lines[2].starts_with("Smoke  [high]    3B Room 403"));

        let numbered = alert_table(&[alert("a1", AlertStatus::Open)]).render();
        assert!(numbered.lines().nth(2).unwrap().starts_with("1  Smoke"));
        assert!(numbered.lines().nth(2).unwrap().ends_with("Resolve"));
    }

    #[test]
    fn test_maintenance_selector_marks_current_status() {
        let request = MaintenanceRequest {
            request_id: "m1".into(),
            apartment_id: Some("4A".into()),
            resident_name: Some("Alice".into()),
            category: Some("Plumbing".into()),
            status: MaintenanceStatus::InProgress.into(),
            created_at: None,
        };
        let table = maintenance_table(&[request]);
        assert_eq!(
            table.rows()[0][5],
            Cell::Text("Pending (In Progress) Resolved".into())
        );
    }

    #[test]
    fn test_unlisted_values_render_verbatim() {
        let mut odd = alert("a3", AlertStatus::Open);
        odd.status = Reported::parse("Ignored");
        odd.severity = Some(Reported::parse("Critical"));
        let table = alert_table(&[odd]);
        assert_eq!(table.rows()[0][1].to_string(), "[critical]");
        assert_eq!(table.rows()[0][4].to_string(), "[ignored]");
        assert_eq!(table.rows()[0][5], Cell::Actions(vec![]));

        let request = MaintenanceRequest {
            request_id: "m9".into(),
            apartment_id: None,
            resident_name: None,
            category: None,
            status: Reported::parse("on_hold"),
            created_at: None,
        };
        let table = maintenance_table(&[request]);
        let row = &table.rows()[0];
        assert_eq!(row[3].to_string(), "[on_hold]");
        assert_eq!(row[5], Cell::Text("Pending In Progress Resolved".into()));
    }

    #[test]
    fn test_colour_keeps_columns_aligned() {
        let table = recent_alert_table(&[alert("a1", AlertStatus::Open)]);
        let plain = table.render_with(Palette::Plain);
        let coloured = table.render_with(Palette::Ansi);
        assert_eq!(plain, table.render());
        assert!(!plain.contains('\x1b'));

        let row = coloured.lines().nth(2).unwrap();
        assert!(row.starts_with("Smoke  \x1b[31m[high]\x1b[0m    3B Room 403"));
        assert!(row.ends_with("\x1b[33m[open]\x1b[0m"));
        assert_eq!(
            row.replace("\x1b[31m", "").replace("\x1b[33m", "").replace("\x1b[0m", ""),
            plain.lines().nth(2).unwrap()
        );
        // headers stay plain
        assert_eq!(coloured.lines().next(), plain.lines().next());
    }

    #[test]
    fn test_empty_table() {
        let rendered = package_table(&[]).render();
        assert!(rendered.ends_with("(no rows)\n"));
    }

    #[test]
    fn test_package_actions_and_missing_fields() {
        let package = Package {
            package_id: "p1".into(),
            resident_name: None,
            apartment_id: Some("2D".into()),
            carrier: Some("UPS".into()),
            status: PackageStatus::Notified.into(),
            location: None,
            arrived_at: None,
        };
        let table = package_table(&[package]);
        let row = &table.rows()[0];
        assert_eq!(row[0], Cell::Text(String::new()));
        assert_eq!(row[3].to_string(), "[Notified]");
        assert_eq!(row[6].to_string(), "Picked up | Delete");
    }

    #[test]
    fn test_latest_reading_units() {
        let latest = Reading {
            timestamp: None,
            temperature: Some(SensorValue::Number(21.456)),
            smoke: Some(SensorValue::Number(0.0)),
            noise: None,
            motion: Some(SensorValue::Flag(true)),
        };
        let rows = latest_reading_table(&latest).rows().to_vec();
        assert_eq!(rows[0][1], Cell::Text("21.46 °C".into()));
        assert_eq!(rows[2][1], Cell::Text(" dB".into()));
        assert_eq!(rows[3][1], Cell::Text("Detected".into()));

        let empty = latest_reading_table(&Reading::default());
        assert_eq!(empty.rows()[3][1], Cell::Text("None".into()));
    }

    #[test]
    fn test_missing_counts() {
        let counts = OverviewCounts {
            alerts_unresolved: Some(3),
            ..Default::default()
        };
        let table = counts_table(&counts);
        assert_eq!(table.rows()[0][1], Cell::Text("--".into()));
        assert_eq!(table.rows()[1][1], Cell::Text("3".into()));
    }
}

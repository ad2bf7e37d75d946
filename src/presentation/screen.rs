// Renders the current section of the dashboard
use crate::application::dashboard_service::{Dashboard, Section};
use crate::application::resource_view::{Resource, ResourceView};
use crate::application::rooms_view::{RoomDetail, DETAIL_SUBTITLE};
use crate::domain::filter::FilterControls;
use crate::domain::overview::Overview;
use crate::presentation::badge::Palette;
use crate::presentation::table_mapper::{
    alert_table, counts_table, history_table, latest_reading_table, maintenance_table,
    package_table, post_table, recent_alert_table, recent_maintenance_table, room_list_table,
};
use std::fmt::Write;

const NO_ROOM_SELECTED: &str = "Select a room to view sensor details.";
const ROOM_DETAIL_FAILED: &str = "Failed to load room details.";

pub fn render(dashboard: &Dashboard, palette: Palette) -> String {
    let section = dashboard.section();
    let mut out = format!("== {} ==\n{}\n\n", section.title(), section.subtitle());

    match section {
        Section::Overview => render_overview(&mut out, dashboard.overview.overview(), palette),
        Section::Rooms => render_rooms(&mut out, dashboard, palette),
        Section::Alerts => {
            render_filters(&mut out, &dashboard.alerts);
            out.push_str(&alert_table(dashboard.alerts.rows()).render_with(palette));
        }
        Section::Maintenance => {
            render_filters(&mut out, &dashboard.maintenance);
            out.push_str(&maintenance_table(dashboard.maintenance.rows()).render_with(palette));
        }
        Section::Packages => {
            render_filters(&mut out, &dashboard.packages);
            out.push_str(&package_table(dashboard.packages.rows()).render_with(palette));
        }
        Section::Community => {
            render_filters(&mut out, &dashboard.community);
            out.push_str(&post_table(dashboard.community.rows()).render_with(palette));
        }
    }
    out
}

/// Active constraints, or `all` when the view is unfiltered
fn render_filters<R: Resource>(out: &mut String, view: &ResourceView<R>) {
    let active: Vec<String> = view
        .filter()
        .query_pairs()
        .into_iter()
        .map(|(control, value)| format!("{control}={value}"))
        .collect();
    let shown = if active.is_empty() { "all".to_string() } else { active.join(" ") };
    let _ = writeln!(
        out,
        "Filters ({}): {shown}\n",
        <R::Filter as FilterControls>::controls().join(", ")
    );
}

fn render_overview(out: &mut String, overview: Option<&Overview>, palette: Palette) {
    let fallback = Overview::default();
    let overview = overview.unwrap_or(&fallback);
    out.push_str(&counts_table(&overview.counts).render_with(palette));
    out.push_str("\nRecent alerts\n");
    out.push_str(&recent_alert_table(&overview.recent_alerts).render_with(palette));
    out.push_str("\nRecent maintenance\n");
    out.push_str(&recent_maintenance_table(&overview.recent_maintenance).render_with(palette));
}

fn render_rooms(out: &mut String, dashboard: &Dashboard, palette: Palette) {
    let rooms = &dashboard.rooms;
    if !rooms.query().is_empty() {
        let _ = writeln!(out, "Search: {}\n", rooms.query());
    }
    out.push_str(&room_list_table(&rooms.visible()).render_with(palette));
    out.push('\n');

    match rooms.detail() {
        RoomDetail::Empty => {
            let _ = writeln!(out, "{NO_ROOM_SELECTED}");
        }
        RoomDetail::Failed { title } => {
            let _ = writeln!(out, "-- {title} --\n{DETAIL_SUBTITLE}\n\n{ROOM_DETAIL_FAILED}");
        }
        RoomDetail::Loaded { title, history } => {
            let _ = writeln!(out, "-- {title} --\n{DETAIL_SUBTITLE}\n\nLatest readings");
            out.push_str(&latest_reading_table(&history.latest()).render_with(palette));
            out.push_str("\nRecent history (last entries)\n");
            out.push_str(&history_table(history.recent()).render_with(palette));
        }
    }
}

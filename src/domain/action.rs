// Row-level actions offered by rendered records

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    /// Alert: open -> resolved
    Resolve,
    /// Maintenance status selector
    SetStatus,
    /// Package: arrived -> notified
    Notify,
    /// Package: anything but picked_up -> picked_up
    PickUp,
    /// Community post: active -> closed
    Close,
    Delete,
    /// Room drill-down
    Open,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Resolve => "Resolve",
            RowAction::SetStatus => "Status",
            RowAction::Notify => "Notify",
            RowAction::PickUp => "Picked up",
            RowAction::Close => "Close",
            RowAction::Delete => "Delete",
            RowAction::Open => "Open",
        }
    }
}

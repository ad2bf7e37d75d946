// Application layer - View controllers and the ports they drive
pub mod dashboard_service;
pub mod data_source;
pub mod overview_view;
pub mod prompt;
pub mod resource_view;
pub mod rooms_view;

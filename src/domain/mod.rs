// Domain layer - Records served by the admin backend
pub mod action;
pub mod alert;
pub mod community;
pub mod filter;
pub mod maintenance;
pub mod overview;
pub mod package;
pub mod reported;
pub mod room;

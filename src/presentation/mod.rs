// Presentation layer - Console rendering and command handling
pub mod badge;
pub mod console;
pub mod format;
pub mod screen;
pub mod table_mapper;

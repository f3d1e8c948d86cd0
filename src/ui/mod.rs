//! Ratatui front-end: the library table, the add-book modal and the event
//! loop that feeds key presses into them.

mod app;
mod forms;
mod helpers;
pub mod table;
mod terminal;

pub use app::App;
pub use terminal::run_app;

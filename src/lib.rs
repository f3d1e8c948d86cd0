//! Core library surface for the book library tracker.
//!
//! The domain pieces (models, store, table rendering) do not depend on a
//! terminal, so they can be driven directly from tests or other front-ends.
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Ambient setup used by `main.rs` before the UI starts.
pub use config::Config;
pub use logging::init_logging;

/// Domain types and the in-memory library.
pub use models::{Book, BookId, NewBook};
pub use store::{LibraryStore, StoreError, StoreResult};

/// The interactive application entry point and state container.
pub use ui::table::{render, Control, ControlTag, DisplayRow, PLACEHOLDER_TEXT};
pub use ui::{run_app, App};

//! In-memory library state split across logical submodules.

mod error;
mod library;

pub use error::{StoreError, StoreResult};
pub use library::LibraryStore;

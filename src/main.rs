//! Binary entry point: load configuration, start file logging if requested,
//! and drive the Ratatui event loop over an empty library until the user
//! exits.
use book_library::{init_logging, run_app, App, Config, LibraryStore};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;

    let mut app = App::new(LibraryStore::new());
    run_app(&mut app)
}

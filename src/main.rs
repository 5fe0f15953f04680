//! Binary entry point: resolve the database location, start logging, make
//! sure the schema exists, then hand control to the Ratatui event loop.
use anyhow::Context;
use library_manager::logging::init_logging;
use library_manager::{run_app, App, Store, StoreConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = StoreConfig::default_location().context("failed to resolve database path")?;
    init_logging(&config.log_path())?;
    info!(db = %config.db_path().display(), "starting library manager");

    let store = Store::new(config);
    store
        .initialize_schema()
        .context("failed to initialize database")?;

    let mut app = App::new(store).context("failed to load library records")?;
    run_app(&mut app)
}

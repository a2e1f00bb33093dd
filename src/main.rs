//! Binary entry point: resolve the data directory, open the catalog and the
//! preference file, then drive the Ratatui event loop until the user exits.
use android_one::viewmodel::CompletionPolicy;
use android_one::{
    logging, run_app, App, AppPaths, ContentRepository, Database, PreferencesStore, Services,
};
use log::info;

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    logging::init(&paths.log_file)?;
    info!("starting with data directory {}", paths.data_dir.display());

    let repository = ContentRepository::new(Database::open_at(&paths.database)?);
    let preferences = PreferencesStore::open(&paths.preferences)?;
    let services = Services::new(repository, preferences, CompletionPolicy::default());

    let mut app = App::new(services);
    let result = run_app(&mut app);
    info!("shutting down");
    result
}

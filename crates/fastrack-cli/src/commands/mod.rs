pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod fast;
pub mod history;
pub mod plan;

use fastrack_core::{Config, FastingController, SqliteStore, SystemClock};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Controller over the on-disk store, tuned by the config file.
pub fn open_controller(
    config: &Config,
) -> Result<FastingController<SqliteStore, SystemClock>, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let controller = FastingController::load(store, SystemClock)?;
    tracing::debug!(
        status = ?controller.status(),
        window_min = config.tracker.completion_window_min,
        "controller ready"
    );
    Ok(controller.with_settings(config.session_settings()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

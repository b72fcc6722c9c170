mod config;
pub mod database;
mod memory;

pub use config::{Config, DisplayConfig, LogConfig, TrackerConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Synchronous string key-value persistence.
///
/// The session controller is the only writer; values are opaque strings.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Apply a batch of writes all-or-nothing. `Some` sets the key, `None`
    /// removes it. On error the store is left as it was.
    fn apply(&mut self, writes: &[(&str, Option<&str>)]) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `FASTRACK_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/fastrack[-dev]/`, with `-dev` selected by `FASTRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FASTRACK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FASTRACK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("fastrack-dev")
            } else {
                base_dir.join("fastrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

mod config;
pub mod database;
pub mod settings;

pub use config::{AppConfig, GameConfig};
pub use database::{Database, KvStore, MemoryStore};
pub use settings::{Settings, CUSTOM_PRESETS_KEY, TIMER_SETTINGS_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `HIITDECK_DATA_DIR` wins when set. Otherwise `~/.config/hiitdeck[-dev]/`,
/// with the `-dev` suffix when `HIITDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("HIITDECK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HIITDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("hiitdeck-dev")
            } else {
                base_dir.join("hiitdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

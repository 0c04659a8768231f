mod config;
pub mod database;
pub mod stores;

pub use config::Config;
pub use database::Database;
pub use stores::{
    AlarmStore, PlayerStore, ScheduleMap, ScheduleMapStore, SqliteAlarmStore, SqlitePlayerStore,
    SqliteScheduleMapStore,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/wakequest[-dev]/` based on WAKEQUEST_ENV.
///
/// Set WAKEQUEST_ENV=dev to use the development data directory, or
/// WAKEQUEST_DATA_DIR to point somewhere else entirely (tests do this).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var("WAKEQUEST_DATA_DIR") {
        Ok(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("WAKEQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("wakequest-dev")
            } else {
                base_dir.join("wakequest")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}

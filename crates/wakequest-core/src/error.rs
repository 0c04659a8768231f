//! Core error types for wakequest-core.
//!
//! This module defines the error hierarchy using thiserror. Expected
//! conditions (empty alarm list, absent player record) never surface here --
//! they resolve to defaults at the storage layer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wakequest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The notification collaborator failed to install or cancel a trigger
    #[error("Notification error: {0}")]
    Notification(String),

    /// Edit-style operation on an alarm id that no longer exists
    #[error("No alarm with id '{0}'")]
    AlarmNotFound(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse a configuration value
    #[error("Failed to parse configuration value: {0}")]
    ParseFailed(String),
}

/// Validation errors. All are rejected synchronously with no effect.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Malformed time-of-day
    #[error("Invalid time of day '{0}': expected HH:MM with hour 0-23 and minute 0-59")]
    InvalidTime(String),

    /// Weekday index outside 0 (Sunday) .. 6 (Saturday)
    #[error("Invalid weekday index {0}: expected 0 (Sunday) to 6 (Saturday)")]
    InvalidWeekday(u8),

    /// Unrecognized difficulty tier name
    #[error("Invalid difficulty '{0}': expected easy, medium or hard")]
    InvalidDifficulty(String),

    /// Snooze request past the per-ring-cycle ceiling
    #[error("No snoozes remaining (limit {max})")]
    SnoozeExhausted { max: u32 },

    /// Snooze request on an alarm with snoozing turned off
    #[error("Snoozing is disabled for this alarm")]
    SnoozeDisabled,

    /// Invalid field value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

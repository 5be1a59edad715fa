//! Core error types for hiitdeck-core.
//!
//! One top-level [`CoreError`] wraps a small enum per subsystem so callers can
//! match on the failure they care about and `?` everything else.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hiitdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Interval timer errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Tic-tac-toe errors
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Application configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Interval timer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A settings field is outside its valid range or empty.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Settings cannot change while the timer is ticking.
    #[error("Settings cannot be changed while the timer is running")]
    ConfigLocked,
}

impl TimerError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        TimerError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Tic-tac-toe errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The target cell already holds a mark.
    #[error("Cell {0} is already taken")]
    CellOccupied(usize),

    /// The game has been won or drawn.
    #[error("The game is over")]
    GameOver,

    /// Cell index outside 0..9.
    #[error("Cell index {0} is out of range")]
    OutOfBounds(usize),

    /// A textual board could not be parsed.
    #[error("Invalid board: {0}")]
    InvalidBoard(&'static str),

    /// The AI was asked to move on a full board.
    #[error("No legal move available")]
    NoLegalMove,
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dotted configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_error_converts_into_core_error() {
        let err: CoreError = TimerError::ConfigLocked.into();
        assert!(matches!(err, CoreError::Timer(TimerError::ConfigLocked)));
        assert!(err.to_string().contains("running"));
    }

    #[test]
    fn invalid_config_names_the_field() {
        let err = TimerError::invalid("work_secs", "must be between 1 and 999");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'work_secs': must be between 1 and 999"
        );
    }
}

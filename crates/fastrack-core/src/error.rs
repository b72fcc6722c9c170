//! Core error types for fastrack-core.
//!
//! All fallible operations in the library return [`Result`], whose error is
//! the [`CoreError`] hierarchy defined here using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fastrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Fasting session transition errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected fasting session transitions.
///
/// A rejected transition never mutates controller state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// StartFasting while a session is already active
    #[error("A fast is already in progress (record {record_id})")]
    AlreadyFasting { record_id: String },

    /// EndFasting while idle
    #[error("No fast is in progress")]
    NotFasting,

    /// DeleteRecord with an id that is not in history
    #[error("No fasting record with id '{id}'")]
    RecordNotFound { id: String },

    /// Custom start time cannot be placed on today's date
    #[error("Start time {time} cannot be resolved on {date}")]
    InvalidStartTime { date: String, time: String },
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Persisted state was written by a newer schema
    #[error("Stored state uses schema version {found}, this build supports up to {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Plan lookup failed
    #[error("Unknown fasting plan: {0}")]
    UnknownPlan(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

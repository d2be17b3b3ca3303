//! Unified error type hierarchy for Parity Matrix
//!
//! Provides structured error handling with DatasetError, ConfigError and AppError.
//! The matrix core itself is total: only the I/O edges (dataset loading,
//! settings persistence, log files) produce errors.

use std::io;
use thiserror::Error;

/// Dataset loading and validation errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid JSON in dataset: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid TOML in dataset: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Duplicate competitor id: {0}")]
    DuplicateEntity(String),

    #[error("Duplicate period label: {0}")]
    DuplicatePeriod(String),

    #[error("Row '{row}' references unknown competitor '{entity}'")]
    UnknownEntity { row: String, entity: String },

    #[error("IO error during dataset load: {0}")]
    IoError(#[from] io::Error),
}

/// Settings file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in settings: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Settings validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during settings operations: {0}")]
    IoError(#[from] io::Error),
}

/// Global error type surfaced by the application shell
///
/// Provides unified error categorization and user-facing messages.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Dataset could not be read or failed validation
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Settings persist or deserialize error
    #[error("Settings error: {0}")]
    Settings(String),

    /// Logging pipeline could not be started
    #[error("Logging error: {0}")]
    Logging(String),

    /// File I/O error (read/write/delete)
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Dataset(msg) => format!("Could not load rate data: {}", msg),
            AppError::Settings(msg) => format!("Settings error: {}", msg),
            AppError::Logging(msg) => format!("Could not start logging: {}", msg),
            AppError::Io(msg) => format!("File operation failed: {}", msg),
        }
    }
}

impl From<DatasetError> for AppError {
    fn from(e: DatasetError) -> Self {
        AppError::Dataset(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Settings(e.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

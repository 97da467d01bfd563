//! Unified application error type.
//! All modules (store, config, cli, models) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("File operation failed: {message}")]
    FileOperation {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("Corrupted shard {path}: {message}")]
    DataCorruption { path: String, message: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid shard key: {0}")]
    InvalidKey(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid rate unit: {0}")]
    InvalidRateUnit(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Migration errors
    // ---------------------------
    #[error("Migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Wrap an io::Error with a short user-facing message.
    pub fn file_op(message: impl Into<String>, source: io::Error) -> Self {
        AppError::FileOperation {
            message: message.into(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

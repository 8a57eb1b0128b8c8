//! Common error types for MoodTunes

use thiserror::Error;

/// Common result type for MoodTunes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the MoodTunes crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Model artifact parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classifier artifact missing, inconsistent, or unable to predict
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

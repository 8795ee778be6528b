//! Error types for the tickbar pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tickbar pipeline.
///
/// Record-level validation failures are not represented here: they are
/// counted drops, see `CleaningStats` in the ingestion crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single input file could not be opened, read or parsed.
    #[error("File access error: {0}")]
    FileAccess(String),

    /// Malformed interval expression.
    #[error("Interval format error: {0}")]
    IntervalFormat(String),

    /// The output table could not be written.
    #[error("Output write error: {0}")]
    OutputWrite(String),

    /// Data error (invalid or missing data).
    #[error("Data error: {0}")]
    Data(String),

    /// The ingestion worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a file access error.
    pub fn file_access(msg: impl Into<String>) -> Self {
        Error::FileAccess(msg.into())
    }

    /// Create an interval format error.
    pub fn interval_format(msg: impl Into<String>) -> Self {
        Error::IntervalFormat(msg.into())
    }

    /// Create an output write error.
    pub fn output_write(msg: impl Into<String>) -> Self {
        Error::OutputWrite(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a worker pool error.
    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Error::WorkerPool(msg.into())
    }
}

//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Input path does not exist.
    #[error("source file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// Input path exists but is not a regular file.
    #[error("{} does not name a valid file", .0.display())]
    NotAFile(PathBuf),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] mccode_core::Error),
}

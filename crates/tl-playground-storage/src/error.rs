//! Storage error types.

use thiserror::Error;

/// Errors that can occur while persisting a snippet.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a JSON object of strings.
    #[error("corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Storage result type alias.
pub type StorageResult<T> = Result<T, StorageError>;

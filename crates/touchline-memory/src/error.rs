//! Error types for snapshot storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the snapshot store.
///
/// A snapshot that was never saved is not an error: `load` reports it as
/// `Ok(None)`. These variants cover the cases where a file exists or should
/// exist but cannot be used.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The snapshot file exists but could not be read.
    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not a JSON array of objects.
    #[error("Corrupt snapshot {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Creating the directory or writing the snapshot failed.
    #[error("Failed to write snapshot {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be serialized.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using `MemoryError`.
pub type Result<T> = std::result::Result<T, MemoryError>;

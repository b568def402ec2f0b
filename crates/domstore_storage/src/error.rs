//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while opening, writing or reading an engine.
///
/// A missing key is never an error: lookups report absence as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The underlying engine reported a failure.
    #[error("{engine} error: {message}")]
    Engine {
        /// Name of the engine that failed.
        engine: &'static str,
        /// The engine's own description of the failure.
        message: String,
    },

    /// Another handle holds the storage location.
    #[error("storage location locked: {}", location.display())]
    Locked {
        /// The contested location.
        location: PathBuf,
    },

    /// A fault injected by a test harness.
    #[error("injected fault in batch {batch}")]
    InjectedFault {
        /// Zero-based index of the failing batch.
        batch: usize,
    },
}

impl StorageError {
    /// Wraps an engine-specific error.
    pub fn engine(engine: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Engine {
            engine,
            message: err.to_string(),
        }
    }

    /// Creates a lock contention error for `location`.
    pub fn locked(location: impl Into<PathBuf>) -> Self {
        Self::Locked {
            location: location.into(),
        }
    }
}

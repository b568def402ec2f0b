//! Error types for the Store contract.

use domstore_storage::StorageError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by a backend. None of them are retried internally.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Engine open, lookup or close failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error outside of the input file (test directory, log sink).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input list could not be read.
    #[error("cannot read input {}: {source}", path.display())]
    Input {
        /// Path of the input list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A write or commit failed during ingestion. Earlier batches remain
    /// committed.
    #[error("batch {batch} failed: {source}")]
    Batch {
        /// Zero-based index of the failing batch.
        batch: usize,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// `test` or `teardown` was called before a successful `load`.
    #[error("store is not loaded")]
    NotLoaded,

    /// `load` was called while a handle is already live.
    #[error("store is already loaded")]
    AlreadyLoaded,

    /// The store was torn down.
    #[error("store is closed")]
    Closed,
}

impl CoreError {
    /// Creates an input error for `path`.
    pub fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    /// Creates a batch failure error.
    pub fn batch(batch: usize, source: StorageError) -> Self {
        Self::Batch { batch, source }
    }
}

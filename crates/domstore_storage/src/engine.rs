//! Engine trait definitions.

use crate::error::StorageResult;
use crate::sink::LogSink;
use std::path::Path;

/// An embeddable key-value engine that can be opened at a directory.
///
/// Engines are **opaque byte stores**. The benchmark only needs four things
/// from them: a way to tell whether a directory already holds a built store,
/// a writable open for bulk ingestion, a read-only open for measurement, and
/// point lookups.
///
/// # Invariants
///
/// - `open_writable` creates the store if `exists` reported `false`
/// - data committed through a [`WriteBatch`] is visible to a later
///   `open_read_only` of the same location
/// - `open_read_only` never triggers writes or background maintenance that
///   the engine lets callers disable
///
/// # Implementors
///
/// - [`super::InMemoryEngine`] - process-local, for tests and baselines
/// - [`super::RedbEngine`] - pure-Rust B-tree (feature `redb`)
/// - [`super::RocksDbEngine`] - LSM tree (feature `rocksdb`)
pub trait Engine: Send + Sync {
    /// Short name of the engine, used for directory and log file names.
    fn name(&self) -> &'static str;

    /// Returns `true` if `location` already holds a store built by this engine.
    fn exists(&self, location: &Path) -> bool;

    /// Opens (creating if needed) a writable store at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot create or open the store.
    fn open_writable(&self, location: &Path, sink: &LogSink)
        -> StorageResult<Box<dyn WritableStore>>;

    /// Opens an existing store at `location` for reads only.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing or cannot be opened.
    fn open_read_only(
        &self,
        location: &Path,
        sink: &LogSink,
    ) -> StorageResult<Box<dyn ReadOnlyStore>>;
}

/// A store opened for ingestion.
pub trait WritableStore: Send {
    /// Starts a new atomic batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses to start a transaction.
    fn begin_batch(&self) -> StorageResult<Box<dyn WriteBatch + '_>>;

    /// Flushes and releases the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    fn close(self: Box<Self>) -> StorageResult<()>;
}

/// A group of writes committed as one transaction.
///
/// Dropping a batch without calling [`WriteBatch::commit`] discards it.
pub trait WriteBatch {
    /// Stages a key/value pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the entry.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Number of staged entries.
    fn len(&self) -> usize;

    /// Commits every staged entry atomically, consuming the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; nothing from this batch is
    /// visible afterwards.
    fn commit(self: Box<Self>) -> StorageResult<()>;
}

/// A store reopened for measurement. Writes are not reachable through it.
pub trait ReadOnlyStore: Send + Sync {
    /// Begins a consistent read view.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot start a read transaction.
    fn begin_read(&self) -> StorageResult<Box<dyn ReadView + '_>>;

    /// Releases the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails while closing.
    fn close(self: Box<Self>) -> StorageResult<()>;
}

/// A consistent snapshot used for one or more lookups.
pub trait ReadView {
    /// Returns `true` if `key` is present. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for genuine engine faults.
    fn contains(&self, key: &[u8]) -> StorageResult<bool>;
}

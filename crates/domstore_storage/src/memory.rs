//! In-memory engine for tests and baselines.

use crate::engine::{Engine, ReadOnlyStore, ReadView, WritableStore, WriteBatch};
use crate::error::{StorageError, StorageResult};
use crate::sink::LogSink;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// An engine that keeps every store in process memory.
///
/// Stores are keyed by location, and clones of the engine share them, so a
/// store built by one backend can be "reopened" by another within the same
/// process. Nothing touches the disk.
///
/// This engine is suitable for:
/// - Unit and contract tests
/// - A zero-I/O baseline next to the persistent engines
///
/// # Example
///
/// ```rust
/// use domstore_storage::{Engine, InMemoryEngine, LevelFilter, LogSink};
/// use std::path::Path;
///
/// let dir = tempfile::tempdir().unwrap();
/// let sink = LogSink::open(&dir.path().join("memory.log"), LevelFilter::INFO).unwrap();
/// let engine = InMemoryEngine::new();
/// let location = Path::new("corpus");
///
/// let store = engine.open_writable(location, &sink).unwrap();
/// let mut batch = store.begin_batch().unwrap();
/// batch.put(b"example.com", b"example.com").unwrap();
/// batch.commit().unwrap();
/// store.close().unwrap();
///
/// let reader = engine.open_read_only(location, &sink).unwrap();
/// assert!(reader.begin_read().unwrap().contains(b"example.com").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    stores: Arc<RwLock<HashMap<PathBuf, Arc<RwLock<Table>>>>>,
}

impl InMemoryEngine {
    /// Creates an engine with no stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries stored at `location`, if a store exists.
    #[must_use]
    pub fn entry_count(&self, location: &Path) -> Option<usize> {
        self.stores
            .read()
            .get(location)
            .map(|table| table.read().len())
    }
}

impl Engine for InMemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn exists(&self, location: &Path) -> bool {
        self.stores.read().contains_key(location)
    }

    fn open_writable(
        &self,
        location: &Path,
        _sink: &LogSink,
    ) -> StorageResult<Box<dyn WritableStore>> {
        let table = Arc::clone(
            self.stores
                .write()
                .entry(location.to_path_buf())
                .or_default(),
        );
        tracing::info!(location = %location.display(), "opened in-memory store");

        Ok(Box::new(MemoryWriter { table }))
    }

    fn open_read_only(
        &self,
        location: &Path,
        _sink: &LogSink,
    ) -> StorageResult<Box<dyn ReadOnlyStore>> {
        let table = self.stores.read().get(location).cloned().ok_or_else(|| {
            StorageError::engine(
                "memory",
                format!("no store at {}", location.display()),
            )
        })?;

        Ok(Box::new(MemoryReader { table }))
    }
}

struct MemoryWriter {
    table: Arc<RwLock<Table>>,
}

impl WritableStore for MemoryWriter {
    fn begin_batch(&self) -> StorageResult<Box<dyn WriteBatch + '_>> {
        Ok(Box::new(MemoryBatch {
            table: &self.table,
            staged: Vec::new(),
        }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        // Nothing buffered outside of batches
        Ok(())
    }
}

struct MemoryBatch<'a> {
    table: &'a RwLock<Table>,
    staged: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch for MemoryBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.staged.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged.len()
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        self.table.write().extend(self.staged);
        Ok(())
    }
}

struct MemoryReader {
    table: Arc<RwLock<Table>>,
}

impl ReadOnlyStore for MemoryReader {
    fn begin_read(&self) -> StorageResult<Box<dyn ReadView + '_>> {
        Ok(Box::new(MemoryView {
            table: self.table.read(),
        }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        Ok(())
    }
}

struct MemoryView<'a> {
    table: RwLockReadGuard<'a, Table>,
}

impl ReadView for MemoryView<'_> {
    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.table.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::run_engine_tests;
    use tracing_subscriber::filter::LevelFilter;
    use tempfile::tempdir;

    fn sink(dir: &Path) -> LogSink {
        LogSink::open(&dir.join("memory-output.log"), LevelFilter::DEBUG).unwrap()
    }

    #[test]
    fn memory_engine_contract() {
        let dir = tempdir().unwrap();
        run_engine_tests(&InMemoryEngine::new(), &dir.path().join("memory"));
    }

    #[test]
    fn clones_share_stores() {
        let dir = tempdir().unwrap();
        let sink = sink(dir.path());
        let engine = InMemoryEngine::new();
        let location = Path::new("shared");

        let store = engine.open_writable(location, &sink).unwrap();
        let mut batch = store.begin_batch().unwrap();
        batch.put(b"a.com", b"v").unwrap();
        batch.commit().unwrap();
        store.close().unwrap();

        let other = engine.clone();
        assert!(other.exists(location));
        assert_eq!(other.entry_count(location), Some(1));
    }

    #[test]
    fn dropped_batch_is_discarded() {
        let dir = tempdir().unwrap();
        let sink = sink(dir.path());
        let engine = InMemoryEngine::new();
        let location = Path::new("dropped");

        let store = engine.open_writable(location, &sink).unwrap();
        {
            let mut batch = store.begin_batch().unwrap();
            batch.put(b"a.com", b"v").unwrap();
            assert_eq!(batch.len(), 1);
        }
        assert_eq!(engine.entry_count(location), Some(0));
    }
}

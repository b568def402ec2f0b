//! Fault injection for ingestion tests.
//!
//! [`FaultyEngine`] wraps any engine and fails the write path at a chosen
//! point. Read paths and the existence probe pass straight through, so a
//! store left behind by a failed load can be reopened by the inner engine.

use domstore_storage::{
    Engine, LogSink, ReadOnlyStore, StorageError, StorageResult, WritableStore, WriteBatch,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Where the write path should fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultPlan {
    /// Fail the commit of this zero-based batch.
    pub commit_at: Option<usize>,
    /// Fail the put of this zero-based entry (counted across batches).
    pub put_at: Option<usize>,
    /// Fail `open_writable`.
    pub open_writable: bool,
}

/// An engine wrapper that injects write failures.
#[derive(Debug, Clone)]
pub struct FaultyEngine<E> {
    inner: E,
    plan: FaultPlan,
}

impl<E: Engine> FaultyEngine<E> {
    /// Wraps `inner` with no faults planned.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            plan: FaultPlan::default(),
        }
    }

    /// Fails the commit of batch `index`.
    pub fn fail_commit(mut self, index: usize) -> Self {
        self.plan.commit_at = Some(index);
        self
    }

    /// Fails the put of entry `index`.
    pub fn fail_put(mut self, index: usize) -> Self {
        self.plan.put_at = Some(index);
        self
    }

    /// Fails every writable open.
    pub fn fail_open(mut self) -> Self {
        self.plan.open_writable = true;
        self
    }

    /// Returns the wrapped engine.
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Engine> Engine for FaultyEngine<E> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn exists(&self, location: &Path) -> bool {
        self.inner.exists(location)
    }

    fn open_writable(
        &self,
        location: &Path,
        sink: &LogSink,
    ) -> StorageResult<Box<dyn WritableStore>> {
        if self.plan.open_writable {
            return Err(StorageError::engine(self.inner.name(), "injected open failure"));
        }

        Ok(Box::new(FaultyWriter {
            inner: self.inner.open_writable(location, sink)?,
            plan: self.plan,
            batches: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }))
    }

    fn open_read_only(
        &self,
        location: &Path,
        sink: &LogSink,
    ) -> StorageResult<Box<dyn ReadOnlyStore>> {
        self.inner.open_read_only(location, sink)
    }
}

struct FaultyWriter {
    inner: Box<dyn WritableStore>,
    plan: FaultPlan,
    batches: AtomicUsize,
    puts: AtomicUsize,
}

impl WritableStore for FaultyWriter {
    fn begin_batch(&self) -> StorageResult<Box<dyn WriteBatch + '_>> {
        Ok(Box::new(FaultyBatch {
            inner: self.inner.begin_batch()?,
            index: self.batches.fetch_add(1, Ordering::SeqCst),
            plan: self.plan,
            puts: &self.puts,
        }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        self.inner.close()
    }
}

struct FaultyBatch<'a> {
    inner: Box<dyn WriteBatch + 'a>,
    index: usize,
    plan: FaultPlan,
    puts: &'a AtomicUsize,
}

impl WriteBatch for FaultyBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst);
        if self.plan.put_at == Some(n) {
            return Err(StorageError::InjectedFault { batch: self.index });
        }
        self.inner.put(key, value)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        if self.plan.commit_at == Some(self.index) {
            // The staged entries are dropped with the inner batch
            return Err(StorageError::InjectedFault { batch: self.index });
        }
        self.inner.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domstore_storage::{InMemoryEngine, LevelFilter};
    use tempfile::tempdir;

    fn sink(dir: &Path) -> LogSink {
        LogSink::open(&dir.join("faulty.log"), LevelFilter::OFF).unwrap()
    }

    #[test]
    fn commit_fault_discards_only_that_batch() {
        let dir = tempdir().unwrap();
        let sink = sink(dir.path());
        let memory = InMemoryEngine::new();
        let engine = FaultyEngine::new(memory.clone()).fail_commit(1);
        let location = Path::new("faulty");

        let store = engine.open_writable(location, &sink).unwrap();
        let mut batch = store.begin_batch().unwrap();
        batch.put(b"a.com", b"a").unwrap();
        batch.commit().unwrap();

        let mut batch = store.begin_batch().unwrap();
        batch.put(b"b.com", b"b").unwrap();
        let err = batch.commit().unwrap_err();
        assert!(matches!(err, StorageError::InjectedFault { batch: 1 }));

        assert_eq!(memory.entry_count(location), Some(1));
    }

    #[test]
    fn put_fault_counts_across_batches() {
        let dir = tempdir().unwrap();
        let sink = sink(dir.path());
        let engine = FaultyEngine::new(InMemoryEngine::new()).fail_put(2);
        let store = engine.open_writable(Path::new("faulty"), &sink).unwrap();

        let mut batch = store.begin_batch().unwrap();
        batch.put(b"a.com", b"a").unwrap();
        batch.put(b"b.com", b"b").unwrap();
        batch.commit().unwrap();

        let mut batch = store.begin_batch().unwrap();
        let err = batch.put(b"c.com", b"c").unwrap_err();
        assert!(matches!(err, StorageError::InjectedFault { batch: 1 }));
    }

    #[test]
    fn open_fault() {
        let dir = tempdir().unwrap();
        let sink = sink(dir.path());
        let engine = FaultyEngine::new(InMemoryEngine::new()).fail_open();

        assert!(engine.open_writable(Path::new("faulty"), &sink).is_err());
        assert_eq!(engine.name(), "memory");
        assert!(!engine.inner().exists(Path::new("faulty")));
    }
}

//! RocksDB engine adapter.

use crate::engine::{Engine, ReadOnlyStore, ReadView, WritableStore, WriteBatch};
use crate::error::{StorageError, StorageResult};
use crate::sink::LogSink;
use rocksdb::{Options, WriteOptions, DB};
use std::path::Path;

const NAME: &str = "rocksdb";

fn rocksdb_err(err: rocksdb::Error) -> StorageError {
    StorageError::engine(NAME, err)
}

/// Engine backed by RocksDB.
///
/// The writable open is tuned for a small memory footprint during bulk
/// ingestion. The read-only reopen uses `open_for_read_only` with automatic
/// compactions off and no background jobs, so lookups are measured without
/// compaction running underneath them. RocksDB's own `LOG` file is written
/// to the sink's directory.
#[derive(Debug, Clone)]
pub struct RocksDbEngine {
    target_file_size: u64,
    write_buffers: i32,
    sync_batches: bool,
}

impl Default for RocksDbEngine {
    fn default() -> Self {
        Self {
            target_file_size: 64 << 16,
            write_buffers: 8,
            sync_batches: false,
        }
    }
}

impl RocksDbEngine {
    /// Creates an engine with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target SST file size in bytes.
    #[must_use]
    pub const fn target_file_size(mut self, bytes: u64) -> Self {
        self.target_file_size = bytes;
        self
    }

    /// Sets the maximum number of memtables.
    #[must_use]
    pub const fn write_buffers(mut self, count: i32) -> Self {
        self.write_buffers = count;
        self
    }

    /// Sets whether each batch write is synced to disk.
    #[must_use]
    pub const fn sync_batches(mut self, value: bool) -> Self {
        self.sync_batches = value;
        self
    }

    fn options(&self, sink: &LogSink) -> Options {
        let mut opts = Options::default();
        opts.set_target_file_size_base(self.target_file_size);
        opts.set_max_write_buffer_number(self.write_buffers);
        opts.set_db_log_dir(sink.dir());
        opts
    }
}

impl Engine for RocksDbEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn exists(&self, location: &Path) -> bool {
        location.join("CURRENT").is_file()
    }

    fn open_writable(
        &self,
        location: &Path,
        sink: &LogSink,
    ) -> StorageResult<Box<dyn WritableStore>> {
        let mut opts = self.options(sink);
        opts.create_if_missing(true);

        let db = DB::open(&opts, location).map_err(rocksdb_err)?;
        tracing::info!(
            location = %location.display(),
            target_file_size = self.target_file_size,
            write_buffers = self.write_buffers,
            "opened rocksdb for writing"
        );

        Ok(Box::new(RocksDbWriter {
            db,
            sync_batches: self.sync_batches,
        }))
    }

    fn open_read_only(
        &self,
        location: &Path,
        sink: &LogSink,
    ) -> StorageResult<Box<dyn ReadOnlyStore>> {
        let mut opts = self.options(sink);
        opts.set_disable_auto_compactions(true);

        let db = DB::open_for_read_only(&opts, location, false).map_err(rocksdb_err)?;
        tracing::info!(location = %location.display(), "opened rocksdb read-only");

        Ok(Box::new(RocksDbReader { db }))
    }
}

struct RocksDbWriter {
    db: DB,
    sync_batches: bool,
}

impl WritableStore for RocksDbWriter {
    fn begin_batch(&self) -> StorageResult<Box<dyn WriteBatch + '_>> {
        Ok(Box::new(RocksDbBatch {
            writer: self,
            batch: rocksdb::WriteBatch::default(),
        }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        self.db.flush().map_err(rocksdb_err)?;
        drop(self.db);
        Ok(())
    }
}

struct RocksDbBatch<'a> {
    writer: &'a RocksDbWriter,
    batch: rocksdb::WriteBatch,
}

impl WriteBatch for RocksDbBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.batch.put(key, value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.batch.len()
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.writer.sync_batches);

        self.writer
            .db
            .write_opt(self.batch, &write_opts)
            .map_err(rocksdb_err)
    }
}

struct RocksDbReader {
    db: DB,
}

impl ReadOnlyStore for RocksDbReader {
    fn begin_read(&self) -> StorageResult<Box<dyn ReadView + '_>> {
        Ok(Box::new(RocksDbView { db: &self.db }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        drop(self.db);
        Ok(())
    }
}

struct RocksDbView<'a> {
    db: &'a DB,
}

impl ReadView for RocksDbView<'_> {
    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.db.get_pinned(key).map_err(rocksdb_err)?.is_some())
    }
}

//! redb engine adapter.
//!
//! Layout of a redb store location:
//!
//! ```text
//! <location>/
//! └─ entries.redb     # single-file B-tree database
//! ```

use crate::engine::{Engine, ReadOnlyStore, ReadView, WritableStore, WriteBatch};
use crate::error::{StorageError, StorageResult};
use crate::sink::LogSink;
use redb::{Builder, Database, Durability, ReadOnlyTable, TableDefinition, TableError};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

const NAME: &str = "redb";
const DATA_FILE: &str = "entries.redb";
const ENTRIES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("entries");

fn redb_err(err: impl Display) -> StorageError {
    StorageError::engine(NAME, err)
}

/// Engine backed by [redb](https://docs.rs/redb), a pure-Rust B-tree store.
///
/// redb runs no background maintenance, so the read-only reopen amounts to
/// reopening the database behind a handle that only exposes read
/// transactions.
#[derive(Debug, Clone)]
pub struct RedbEngine {
    cache_size: usize,
    durable_batches: bool,
}

impl Default for RedbEngine {
    fn default() -> Self {
        Self {
            cache_size: 64 * 1024 * 1024, // 64 MB
            durable_batches: true,
        }
    }
}

impl RedbEngine {
    /// Creates an engine with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = bytes;
        self
    }

    /// Sets whether every batch commit is fsynced.
    ///
    /// When disabled, batches commit with eventual durability and the data
    /// is made durable once when the writable handle closes.
    #[must_use]
    pub const fn durable_batches(mut self, value: bool) -> Self {
        self.durable_batches = value;
        self
    }

    fn data_file(location: &Path) -> PathBuf {
        location.join(DATA_FILE)
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        builder.set_cache_size(self.cache_size);
        builder
    }
}

impl Engine for RedbEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn exists(&self, location: &Path) -> bool {
        Self::data_file(location).is_file()
    }

    fn open_writable(
        &self,
        location: &Path,
        _sink: &LogSink,
    ) -> StorageResult<Box<dyn WritableStore>> {
        fs::create_dir_all(location)?;
        let db = self
            .builder()
            .create(Self::data_file(location))
            .map_err(redb_err)?;

        // Create the table up front so readers never see it missing
        let txn = db.begin_write().map_err(redb_err)?;
        txn.open_table(ENTRIES).map_err(redb_err)?;
        txn.commit().map_err(redb_err)?;

        tracing::info!(
            location = %location.display(),
            cache_size = self.cache_size,
            durable_batches = self.durable_batches,
            "opened redb for writing"
        );

        Ok(Box::new(RedbWriter {
            db,
            durable_batches: self.durable_batches,
        }))
    }

    fn open_read_only(
        &self,
        location: &Path,
        _sink: &LogSink,
    ) -> StorageResult<Box<dyn ReadOnlyStore>> {
        let db = self
            .builder()
            .open(Self::data_file(location))
            .map_err(redb_err)?;

        tracing::info!(location = %location.display(), "opened redb read-only");

        Ok(Box::new(RedbReader { db }))
    }
}

struct RedbWriter {
    db: Database,
    durable_batches: bool,
}

impl WritableStore for RedbWriter {
    fn begin_batch(&self) -> StorageResult<Box<dyn WriteBatch + '_>> {
        Ok(Box::new(RedbBatch {
            writer: self,
            staged: Vec::new(),
        }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        if !self.durable_batches {
            // An immediate commit persists every eventual commit before it
            let mut txn = self.db.begin_write().map_err(redb_err)?;
            txn.set_durability(Durability::Immediate);
            txn.commit().map_err(redb_err)?;
        }
        drop(self.db);
        Ok(())
    }
}

/// Entries are staged in memory and written in a single write transaction
/// on commit. Dropping the batch discards the staged entries.
struct RedbBatch<'a> {
    writer: &'a RedbWriter,
    staged: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch for RedbBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.staged.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged.len()
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        let mut txn = self.writer.db.begin_write().map_err(redb_err)?;
        if !self.writer.durable_batches {
            txn.set_durability(Durability::Eventual);
        }
        {
            let mut table = txn.open_table(ENTRIES).map_err(redb_err)?;
            for (key, value) in &self.staged {
                table
                    .insert(key.as_slice(), value.as_slice())
                    .map_err(redb_err)?;
            }
        }
        txn.commit().map_err(redb_err)
    }
}

struct RedbReader {
    db: Database,
}

impl ReadOnlyStore for RedbReader {
    fn begin_read(&self) -> StorageResult<Box<dyn ReadView + '_>> {
        let txn = self.db.begin_read().map_err(redb_err)?;
        let table = match txn.open_table(ENTRIES) {
            Ok(table) => Some(table),
            Err(TableError::TableDoesNotExist(_)) => None,
            Err(err) => return Err(redb_err(err)),
        };

        Ok(Box::new(RedbView { table }))
    }

    fn close(self: Box<Self>) -> StorageResult<()> {
        drop(self.db);
        Ok(())
    }
}

struct RedbView {
    table: Option<ReadOnlyTable<&'static [u8], &'static [u8]>>,
}

impl ReadView for RedbView {
    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        match &self.table {
            Some(table) => Ok(table.get(key).map_err(redb_err)?.is_some()),
            None => Ok(false),
        }
    }
}

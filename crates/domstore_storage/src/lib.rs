//! # domstore storage
//!
//! Engine trait and adapters for the domstore benchmark.
//!
//! This crate is the seam between the benchmark's Store contract and the
//! embedded key-value engines it compares. Engines are **opaque byte
//! stores**: the crate only asks them to open a directory, commit batches of
//! key/value pairs atomically, reopen read-only and answer point lookups.
//!
//! ## Available Engines
//!
//! - [`InMemoryEngine`] - process-local maps, for tests and baselines
//! - [`RedbEngine`] - pure-Rust B-tree (feature `redb`, on by default)
//! - [`RocksDbEngine`] - LSM tree (feature `rocksdb`)
//!
//! ## Supporting types
//!
//! - [`LogSink`] - per-backend diagnostic log file, installed as a scoped
//!   `tracing` dispatcher
//! - [`LocationLock`] - exclusive advisory lock on a store location

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod lock;
mod memory;
#[cfg(feature = "redb")]
mod redb;
#[cfg(feature = "rocksdb")]
mod rocksdb;
mod sink;

pub use engine::{Engine, ReadOnlyStore, ReadView, WritableStore, WriteBatch};
pub use error::{StorageError, StorageResult};
pub use lock::{LocationLock, LOCK_FILE};
pub use memory::InMemoryEngine;
#[cfg(feature = "redb")]
pub use self::redb::RedbEngine;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::RocksDbEngine;
pub use sink::LogSink;
pub use tracing_subscriber::filter::LevelFilter;

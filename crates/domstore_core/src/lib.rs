//! # domstore core
//!
//! The Store contract of the domstore benchmark and the logic shared by
//! every engine behind it.
//!
//! The benchmark bulk-loads a list of domain names into an embedded
//! key-value engine, reopens it read-only, then answers membership queries
//! with a fallback: an exact match, or failing that a match on the query's
//! root domain.
//!
//! This crate provides:
//! - [`Store`] - the four-operation contract a benchmark driver calls
//! - [`EngineStore`] - the contract implemented over any
//!   [`domstore_storage::Engine`]
//! - Batched, transactional ingestion ([`ingest`])
//! - Root-domain reduction ([`RootRule`], [`rootdomain`])
//! - [`StoreKind`] - discovery of the backends compiled into this build
//!
//! ## Example
//!
//! ```rust
//! use domstore_core::{Store, StoreConfig, StoreKind};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let input = dir.path().join("domains.txt");
//! std::fs::write(&input, "example.com\r\rrust-lang.org").unwrap();
//!
//! let mut store = StoreKind::Memory.build(StoreConfig::default());
//! store.load(&input, dir.path()).unwrap();
//! assert!(store.test("blog.rust-lang.org").unwrap());
//! store.teardown().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod error;
pub mod ingest;
mod matcher;
mod registry;
mod store;

pub use backend::EngineStore;
pub use config::{StoreConfig, DEFAULT_BATCH_SIZE, DEFAULT_LINE_SEPARATOR, DEFAULT_VALUE_SUFFIX};
pub use error::{CoreError, CoreResult};
pub use ingest::IngestStats;
pub use matcher::{rootdomain, RootRule};
pub use registry::{StoreKind, UnknownStoreKind};
pub use store::{LoadReport, Store};

//! # domstore testkit
//!
//! Test utilities for domstore.
//!
//! This crate provides:
//! - Test fixtures: temporary benchmark directories and input-list writers
//! - Property-based generators for domain names and raw input lines
//! - [`FaultyEngine`], an engine wrapper that injects write failures
//! - A Store conformance suite every backend runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use domstore_testkit::prelude::*;
//!
//! #[test]
//! fn memory_backend_conforms() {
//!     run_store_conformance(|| StoreKind::Memory.build(StoreConfig::default()));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod conformance;
pub mod fault;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::conformance::*;
    pub use crate::fault::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use domstore_core::{Store, StoreConfig, StoreKind};
}

pub use conformance::{run_fault_conformance, run_store_conformance};
pub use fault::{FaultPlan, FaultyEngine};
pub use fixtures::*;
pub use generators::*;

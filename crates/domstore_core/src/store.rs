//! The Store contract every backend implements.

use crate::error::CoreResult;
use std::path::Path;

/// One storage engine under comparison, as seen by a benchmark driver.
///
/// # Lifecycle
///
/// ```text
/// new ──load──▶ loaded ──test*──▶ loaded ──teardown──▶ closed
///                                                       │
///                          load (new cycle) ◀───────────┘
/// ```
///
/// - `load` builds the store from an input list, or reuses a store already
///   built under the same test directory, and leaves it open read-only
/// - `test` may only be called between a successful `load` and `teardown`;
///   it takes `&self`, so concurrent lookups from several threads are allowed
/// - `teardown` releases the engine handle and must be called once per
///   successful `load`
///
/// The trait is object safe so drivers can hold `Box<dyn Store>`.
pub trait Store: Send + Sync {
    /// Human-readable identifier naming the engine and its location.
    fn id(&self) -> String;

    /// Builds or reopens the store under `testdir` from the list at `input`.
    ///
    /// Engine diagnostics produced during the call go to a log file in
    /// `testdir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the engine cannot be
    /// opened, or a batch fails to commit. Batches committed before a
    /// failure stay committed.
    fn load(&mut self, input: &Path, testdir: &Path) -> CoreResult<()>;

    /// Returns `true` if `query`, or failing that its root domain, is stored.
    ///
    /// # Errors
    ///
    /// Returns an error for engine faults and lifecycle misuse. A missing
    /// key is `Ok(false)`, never an error.
    fn test(&self, query: &str) -> CoreResult<bool>;

    /// Releases the engine handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not loaded, was already torn down,
    /// or the engine fails while closing.
    fn teardown(&mut self) -> CoreResult<()>;
}

/// What a successful `load` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReport {
    /// A store already existed at the location and was reopened as-is.
    Reused,
    /// The input list was ingested into a fresh store.
    Ingested {
        /// Entries written (blank lines excluded).
        entries: usize,
        /// Batches committed.
        batches: usize,
    },
}

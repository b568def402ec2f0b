//! Exclusive ownership of a storage location.
//!
//! A backend instance owns its location from the start of a load until
//! teardown. The lock file lives inside the location:
//!
//! ```text
//! <location>/
//! ├─ .domstore.lock    # advisory lock, held while a backend is live
//! └─ ...               # engine files
//! ```

use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Name of the lock file inside a storage location.
pub const LOCK_FILE: &str = ".domstore.lock";

/// An advisory lock on a storage location.
///
/// The lock is released when the value is dropped.
#[derive(Debug)]
pub struct LocationLock {
    _lock_file: File,
}

impl LocationLock {
    /// Creates `location` if needed and takes the exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another handle holds the lock, or
    /// an I/O error if the directory or lock file cannot be created.
    pub fn acquire(location: &Path) -> StorageResult<Self> {
        fs::create_dir_all(location)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(location.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::locked(location));
        }

        Ok(Self {
            _lock_file: lock_file,
        })
    }
}

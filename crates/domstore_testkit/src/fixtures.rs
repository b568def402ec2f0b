//! Test fixtures and input-list helpers.
//!
//! Provides temporary test directories laid out the way a benchmark run
//! lays them out, and writers for carriage-return separated domain lists.

use domstore_core::DEFAULT_LINE_SEPARATOR;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary benchmark directory with automatic cleanup.
///
/// ```text
/// <tmp>/
/// ├─ domains.txt     # input list
/// └─ run/            # testdir handed to Store::load
/// ```
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Creates a new empty test directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory passed as `testdir` to `Store::load`.
    pub fn testdir(&self) -> PathBuf {
        self.dir.path().join("run")
    }

    /// Path of the input list.
    pub fn input(&self) -> PathBuf {
        self.dir.path().join("domains.txt")
    }

    /// Writes `lines` as the input list and returns its path.
    pub fn write_input<S: AsRef<str>>(&self, lines: &[S]) -> PathBuf {
        let path = self.input();
        write_domain_list(&path, lines).expect("Failed to write input list");
        path
    }

    /// Deletes the input list.
    pub fn remove_input(&self) {
        fs::remove_file(self.input()).expect("Failed to remove input list");
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `lines` to `path` separated by carriage returns.
pub fn write_domain_list<S: AsRef<str>>(path: &Path, lines: &[S]) -> io::Result<()> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push(DEFAULT_LINE_SEPARATOR);
    }
    fs::write(path, text)
}

/// Generates `count` distinct hosts under a handful of zones.
///
/// Hosts look like `h17.zone3.test`. None of the zones themselves is in the
/// list, so only exact matches hit.
pub fn numbered_hosts(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("h{i}.zone{}.test", i % 7)).collect()
}

//! Diagnostic log sink.
//!
//! Engines and the ingestion loop emit `tracing` events. During a load those
//! events are captured in a file next to the store instead of going to
//! whatever subscriber the host process installed:
//!
//! ```text
//! <testdir>/
//! ├─ redb/                 # store location
//! └─ redb-output.log       # diagnostic sink
//! ```
//!
//! The redirection is scoped: [`LogSink::scoped`] installs the sink as the
//! thread-local default dispatcher for the duration of a closure, so two
//! backends loading on different threads never share or clobber a logger.

use crate::error::StorageResult;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;

/// A file that receives diagnostic output for one backend.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
    file: Arc<File>,
    level: LevelFilter,
}

impl LogSink {
    /// Opens `path` in create+append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path, level: LevelFilter) -> StorageResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(file),
            level,
        })
    }

    /// Returns the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory holding the log file.
    ///
    /// Engines that write their own log files point them here.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Builds a dispatcher that formats events into the sink.
    #[must_use]
    pub fn dispatch(&self) -> Dispatch {
        let file = Arc::clone(&self.file);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || SinkWriter(Arc::clone(&file)))
            .with_ansi(false)
            .with_max_level(self.level)
            .finish();

        Dispatch::new(subscriber)
    }

    /// Runs `f` with this sink as the current thread's default dispatcher.
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch(), f)
    }
}

struct SinkWriter(Arc<File>);

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

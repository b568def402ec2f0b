//! Store implementation shared by every engine.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::ingest;
use crate::store::{LoadReport, Store};
use domstore_storage::{Engine, LocationLock, LogSink, ReadOnlyStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle state of a backend. The read-only handle is dropped before the
/// location lock.
enum State {
    Empty,
    Loaded {
        reader: Box<dyn ReadOnlyStore>,
        _lock: LocationLock,
    },
    Closed,
}

/// A [`Store`] over any [`Engine`].
///
/// The store lives in `<testdir>/<engine name>` and engine diagnostics go
/// to `<testdir>/<engine name>-output.log` while `load` runs.
///
/// # Example
///
/// ```rust
/// use domstore_core::{EngineStore, Store};
/// use domstore_storage::InMemoryEngine;
///
/// let dir = tempfile::tempdir().unwrap();
/// let input = dir.path().join("domains.txt");
/// std::fs::write(&input, "example.com\rrust-lang.org\r").unwrap();
///
/// let mut store = EngineStore::new(InMemoryEngine::new());
/// store.load(&input, dir.path()).unwrap();
/// assert!(store.test("www.example.com").unwrap());
/// assert!(!store.test("example.net").unwrap());
/// store.teardown().unwrap();
/// ```
pub struct EngineStore<E> {
    engine: E,
    config: StoreConfig,
    location: Option<PathBuf>,
    state: State,
    last_load: Option<LoadReport>,
}

impl<E: Engine> EngineStore<E> {
    /// Creates a backend with the default configuration.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, StoreConfig::default())
    }

    /// Creates a backend with an explicit configuration.
    #[must_use]
    pub fn with_config(engine: E, config: StoreConfig) -> Self {
        Self {
            engine,
            config,
            location: None,
            state: State::Empty,
            last_load: None,
        }
    }

    /// Returns the store location once `load` has been called.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Returns what the last successful `load` did.
    #[must_use]
    pub fn last_load(&self) -> Option<LoadReport> {
        self.last_load
    }

    /// Returns `true` between a successful `load` and `teardown`.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    fn reader(&self) -> CoreResult<&dyn ReadOnlyStore> {
        match &self.state {
            State::Loaded { reader, .. } => Ok(reader.as_ref()),
            State::Empty => Err(CoreError::NotLoaded),
            State::Closed => Err(CoreError::Closed),
        }
    }

    fn open_or_build(
        &self,
        input: &Path,
        location: &Path,
        sink: &LogSink,
    ) -> CoreResult<(Box<dyn ReadOnlyStore>, LoadReport)> {
        let name = self.engine.name();

        if self.engine.exists(location) {
            tracing::info!(engine = name, location = %location.display(), "reusing existing store");
            let reader = self.engine.open_read_only(location, sink)?;
            return Ok((reader, LoadReport::Reused));
        }

        let text = ingest::read_input(input)?;
        let writer = self.engine.open_writable(location, sink)?;

        let stats = match ingest::ingest(writer.as_ref(), &text, &self.config) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(engine = name, error = %err, "ingestion aborted");
                if let Err(close_err) = writer.close() {
                    tracing::warn!(engine = name, error = %close_err, "close after abort failed");
                }
                return Err(err);
            }
        };
        drop(text);
        writer.close()?;

        let reader = self.engine.open_read_only(location, sink)?;
        tracing::info!(
            engine = name,
            entries = stats.entries,
            batches = stats.batches,
            "ingested and reopened read-only"
        );

        Ok((
            reader,
            LoadReport::Ingested {
                entries: stats.entries,
                batches: stats.batches,
            },
        ))
    }
}

impl<E: Engine> Store for EngineStore<E> {
    fn id(&self) -> String {
        let location = self
            .location
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        format!("{}: '{}'", self.engine.name(), location)
    }

    fn load(&mut self, input: &Path, testdir: &Path) -> CoreResult<()> {
        if self.is_loaded() {
            return Err(CoreError::AlreadyLoaded);
        }

        let name = self.engine.name();
        fs::create_dir_all(testdir)?;
        let location = testdir.join(name);
        let sink = LogSink::open(
            &testdir.join(format!("{name}-output.log")),
            self.config.log_level,
        )?;
        self.location = Some(location.clone());

        let lock = LocationLock::acquire(&location)?;
        let (reader, report) = sink.scoped(|| self.open_or_build(input, &location, &sink))?;

        self.state = State::Loaded {
            reader,
            _lock: lock,
        };
        self.last_load = Some(report);
        Ok(())
    }

    fn test(&self, query: &str) -> CoreResult<bool> {
        let view = self.reader()?.begin_read()?;
        if view.contains(query.as_bytes())? {
            return Ok(true);
        }

        let root = self.config.root_rule.reduce(query);
        if root == query {
            return Ok(false);
        }
        Ok(view.contains(root.as_bytes())?)
    }

    fn teardown(&mut self) -> CoreResult<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Loaded { reader, _lock } => {
                reader.close()?;
                tracing::info!(engine = self.engine.name(), "store closed");
                Ok(())
            }
            State::Empty => {
                self.state = State::Empty;
                Err(CoreError::NotLoaded)
            }
            State::Closed => Err(CoreError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::RootRule;
    use domstore_storage::InMemoryEngine;
    use tempfile::{tempdir, TempDir};

    fn write_input(dir: &TempDir, lines: &[&str]) -> PathBuf {
        let path = dir.path().join("domains.txt");
        fs::write(&path, lines.join("\r")).unwrap();
        path
    }

    #[test]
    fn load_then_test() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com", "", "  rust-lang.org  "]);
        let mut store = EngineStore::new(InMemoryEngine::new());

        store.load(&input, dir.path()).unwrap();
        assert!(store.test("example.com").unwrap());
        assert!(store.test("rust-lang.org").unwrap());
        assert!(!store.test("").unwrap());
        assert!(!store.test("example.net").unwrap());
        assert_eq!(
            store.last_load(),
            Some(LoadReport::Ingested {
                entries: 2,
                batches: 1
            })
        );
        store.teardown().unwrap();
    }

    #[test]
    fn fallback_to_root_domain() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let mut store = EngineStore::new(InMemoryEngine::new());
        store.load(&input, dir.path()).unwrap();

        assert!(store.test("a.example.com").unwrap());
        assert!(store.test("deep.a.example.com").unwrap());
        assert!(!store.test("a.example.org").unwrap());
    }

    #[test]
    fn fallback_follows_configured_rule() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["b.example.com"]);
        let config = StoreConfig::new().root_rule(RootRule::StripLabels(1));
        let mut store = EngineStore::with_config(InMemoryEngine::new(), config);
        store.load(&input, dir.path()).unwrap();

        assert!(store.test("a.b.example.com").unwrap());
        assert!(!store.test("x.a.b.example.com").unwrap());
    }

    #[test]
    fn identity_rule_disables_fallback() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let config = StoreConfig::new().root_rule(RootRule::Identity);
        let mut store = EngineStore::with_config(InMemoryEngine::new(), config);
        store.load(&input, dir.path()).unwrap();

        assert!(!store.test("a.example.com").unwrap());
    }

    #[test]
    fn values_carry_suffix_only_in_value() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let mut store = EngineStore::new(InMemoryEngine::new());
        store.load(&input, dir.path()).unwrap();

        assert!(!store
            .test("example.com{ group1, group2, group3, group4 }")
            .unwrap());
    }

    #[test]
    fn id_names_engine_and_location() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let mut store = EngineStore::new(InMemoryEngine::new());
        assert_eq!(store.id(), "memory: ''");

        store.load(&input, dir.path()).unwrap();
        let expected = format!("memory: '{}'", dir.path().join("memory").display());
        assert_eq!(store.id(), expected);
        assert_eq!(store.location(), Some(dir.path().join("memory").as_path()));
    }

    #[test]
    fn lifecycle_misuse_is_reported() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let mut store = EngineStore::new(InMemoryEngine::new());

        assert!(matches!(store.test("example.com"), Err(CoreError::NotLoaded)));
        assert!(matches!(store.teardown(), Err(CoreError::NotLoaded)));

        store.load(&input, dir.path()).unwrap();
        assert!(matches!(
            store.load(&input, dir.path()),
            Err(CoreError::AlreadyLoaded)
        ));

        store.teardown().unwrap();
        assert!(!store.is_loaded());
        assert!(matches!(store.test("example.com"), Err(CoreError::Closed)));
        assert!(matches!(store.teardown(), Err(CoreError::Closed)));
    }

    #[test]
    fn reload_after_teardown_reuses_store() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let mut store = EngineStore::new(InMemoryEngine::new());

        store.load(&input, dir.path()).unwrap();
        store.teardown().unwrap();

        fs::remove_file(&input).unwrap();
        store.load(&input, dir.path()).unwrap();
        assert_eq!(store.last_load(), Some(LoadReport::Reused));
        assert!(store.test("example.com").unwrap());
        store.teardown().unwrap();
    }

    #[test]
    fn missing_input_fails_without_leaving_a_store() {
        let dir = tempdir().unwrap();
        let engine = InMemoryEngine::new();
        let mut store = EngineStore::new(engine.clone());

        let result = store.load(&dir.path().join("absent.txt"), dir.path());
        assert!(matches!(result, Err(CoreError::Input { .. })));
        assert!(!store.is_loaded());
        assert!(!engine.exists(&dir.path().join("memory")));
    }

    #[test]
    fn load_writes_diagnostics_to_sink() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com", "example.org"]);
        let mut store = EngineStore::new(InMemoryEngine::new());
        store.load(&input, dir.path()).unwrap();

        let log = fs::read_to_string(dir.path().join("memory-output.log")).unwrap();
        assert!(log.contains("committed batch"));
        assert!(log.contains("ingested and reopened read-only"));
    }

    #[test]
    fn batch_log_reports_staged_entries() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["a.com", "b.com", "", "c.com"]);
        let config = StoreConfig::new().batch_size(2);
        let mut store = EngineStore::with_config(InMemoryEngine::new(), config);
        store.load(&input, dir.path()).unwrap();

        let log = fs::read_to_string(dir.path().join("memory-output.log")).unwrap();
        assert!(log.contains("batch=0 entries=2"));
        assert!(log.contains("batch=1 entries=1"));
    }

    #[test]
    fn testdir_is_created() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, &["example.com"]);
        let testdir = dir.path().join("runs").join("1");
        let mut store = EngineStore::new(InMemoryEngine::new());

        store.load(&input, &testdir).unwrap();
        assert!(testdir.join("memory-output.log").is_file());
    }
}

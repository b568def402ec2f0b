//! Batched ingestion of an input list.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use domstore_storage::WritableStore;
use std::fs;
use std::path::Path;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Entries written.
    pub entries: usize,
    /// Batches committed.
    pub batches: usize,
}

/// Reads the whole input list as text.
///
/// # Errors
///
/// Returns [`CoreError::Input`] if the file is missing, unreadable or not
/// valid UTF-8.
pub fn read_input(path: &Path) -> CoreResult<String> {
    fs::read_to_string(path).map_err(|err| CoreError::input(path, err))
}

/// Splits `text` into entries: trimmed, non-blank lines in input order.
pub fn entries(text: &str, separator: char) -> impl Iterator<Item = &str> {
    text.split(separator)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Writes every entry of `text` into `store`, `batch_size` entries per
/// committed batch.
///
/// The key is the entry itself; the value is the entry followed by the
/// configured suffix. At most one batch is staged at a time. The first put
/// or commit failure stops ingestion; batches committed before it are kept.
///
/// # Errors
///
/// Returns [`CoreError::Batch`] with the index of the failing batch.
pub fn ingest(
    store: &dyn WritableStore,
    text: &str,
    config: &StoreConfig,
) -> CoreResult<IngestStats> {
    let batch_size = config.batch_size.max(1);
    let suffix = config.value_suffix.as_bytes();
    let mut stats = IngestStats::default();
    let mut value = Vec::new();
    let mut lines = entries(text, config.line_separator).peekable();

    while lines.peek().is_some() {
        let index = stats.batches;
        let mut batch = store
            .begin_batch()
            .map_err(|err| CoreError::batch(index, err))?;

        for line in lines.by_ref().take(batch_size) {
            value.clear();
            value.extend_from_slice(line.as_bytes());
            value.extend_from_slice(suffix);
            batch
                .put(line.as_bytes(), &value)
                .map_err(|err| CoreError::batch(index, err))?;
        }

        let staged = batch.len();
        batch.commit().map_err(|err| CoreError::batch(index, err))?;
        stats.batches += 1;
        stats.entries += staged;
        tracing::debug!(batch = index, entries = staged, "committed batch");
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domstore_storage::{Engine, InMemoryEngine, LevelFilter, LogSink};
    use tempfile::tempdir;

    const LOCATION: &str = "inspect";

    fn ingest_into_memory(text: &str, config: &StoreConfig) -> (InMemoryEngine, IngestStats) {
        let dir = tempdir().unwrap();
        let sink = LogSink::open(&dir.path().join("memory-output.log"), LevelFilter::OFF).unwrap();
        let engine = InMemoryEngine::new();
        let store = engine.open_writable(Path::new(LOCATION), &sink).unwrap();
        let stats = ingest(store.as_ref(), text, config).unwrap();
        store.close().unwrap();
        (engine, stats)
    }

    #[test]
    fn entries_skip_blank_lines() {
        let text = "example.com\r\r  \r mail.example.org \r\n\rrust-lang.org";
        let lines: Vec<_> = entries(text, '\r').collect();
        assert_eq!(lines, ["example.com", "mail.example.org", "rust-lang.org"]);
    }

    #[test]
    fn crlf_input_is_trimmed() {
        let text = "a.com\r\nb.com\r\nc.com\r\n";
        let lines: Vec<_> = entries(text, '\r').collect();
        assert_eq!(lines, ["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn newline_only_input_is_one_line_with_default_separator() {
        let lines: Vec<_> = entries("a.com\nb.com", '\r').collect();
        assert_eq!(lines, ["a.com\nb.com"]);
        let lines: Vec<_> = entries("a.com\nb.com", '\n').collect();
        assert_eq!(lines, ["a.com", "b.com"]);
    }

    #[test]
    fn batches_are_full_except_last() {
        let text: Vec<String> = (0..(128 * 3 + 5)).map(|i| format!("h{i}.example.com")).collect();
        let text = text.join("\r");

        let (engine, stats) = ingest_into_memory(&text, &StoreConfig::default());
        assert_eq!(stats, IngestStats { entries: 389, batches: 4 });
        assert_eq!(engine.entry_count(Path::new(LOCATION)), Some(389));
    }

    #[test]
    fn exact_multiple_has_no_empty_trailing_batch() {
        let text: Vec<String> = (0..8).map(|i| format!("h{i}.example.com")).collect();
        let config = StoreConfig::new().batch_size(4);

        let (_, stats) = ingest_into_memory(&text.join("\r"), &config);
        assert_eq!(stats, IngestStats { entries: 8, batches: 2 });
    }

    #[test]
    fn blank_input_commits_nothing() {
        let (engine, stats) = ingest_into_memory("\r \r\t\r", &StoreConfig::default());
        assert_eq!(stats, IngestStats::default());
        assert_eq!(engine.entry_count(Path::new(LOCATION)), Some(0));
    }

    #[test]
    fn duplicates_count_but_collapse() {
        let (engine, stats) = ingest_into_memory("a.com\ra.com\rb.com", &StoreConfig::default());
        assert_eq!(stats.entries, 3);
        assert_eq!(engine.entry_count(Path::new(LOCATION)), Some(2));
    }

    #[test]
    fn missing_input_is_an_input_error() {
        let dir = tempdir().unwrap();
        let result = read_input(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(CoreError::Input { .. })));
    }

    #[test]
    fn non_utf8_input_is_an_input_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_input(&path), Err(CoreError::Input { .. })));
    }
}

//! Store configuration.

use crate::matcher::RootRule;
use domstore_storage::LevelFilter;

/// Number of entries committed per write transaction.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Payload appended to every key to give values a realistic record size.
pub const DEFAULT_VALUE_SUFFIX: &str = "{ group1, group2, group3, group4 }";

/// Line separator of the input lists.
pub const DEFAULT_LINE_SEPARATOR: char = '\r';

/// Configuration shared by every backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Entries per atomic batch. Never below 1.
    pub batch_size: usize,

    /// Suffix appended to the key to form the stored value.
    pub value_suffix: String,

    /// Character separating lines in the input file.
    pub line_separator: char,

    /// Reduction used for the fallback lookup.
    pub root_rule: RootRule,

    /// Most verbose level written to the diagnostic sink.
    pub log_level: LevelFilter,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            value_suffix: DEFAULT_VALUE_SUFFIX.to_string(),
            line_separator: DEFAULT_LINE_SEPARATOR,
            root_rule: RootRule::default(),
            log_level: LevelFilter::DEBUG,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch size. Zero is raised to one.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets the value suffix.
    #[must_use]
    pub fn value_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.value_suffix = suffix.into();
        self
    }

    /// Sets the input line separator.
    #[must_use]
    pub fn line_separator(mut self, separator: char) -> Self {
        self.line_separator = separator;
        self
    }

    /// Sets the fallback reduction rule.
    #[must_use]
    pub fn root_rule(mut self, rule: RootRule) -> Self {
        self.root_rule = rule;
        self
    }

    /// Sets the diagnostic sink level.
    #[must_use]
    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.batch_size, 128);
        assert_eq!(config.value_suffix, "{ group1, group2, group3, group4 }");
        assert_eq!(config.line_separator, '\r');
        assert_eq!(config.root_rule, RootRule::KeepLabels(2));
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .batch_size(16)
            .value_suffix("")
            .line_separator('\n')
            .root_rule(RootRule::StripLabels(1))
            .log_level(LevelFilter::OFF);

        assert_eq!(config.batch_size, 16);
        assert!(config.value_suffix.is_empty());
        assert_eq!(config.line_separator, '\n');
        assert_eq!(config.root_rule, RootRule::StripLabels(1));
        assert_eq!(config.log_level, LevelFilter::OFF);
    }

    #[test]
    fn zero_batch_size_is_raised() {
        assert_eq!(StoreConfig::new().batch_size(0).batch_size, 1);
    }
}

//! Property-based test generators using proptest.
//!
//! Provides strategies for domain names and raw input lines.

use proptest::prelude::*;

/// Strategy for a single DNS label (letters, digits, inner hyphens).
pub fn label_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]([a-z0-9-]{0,14}[a-z0-9])?").expect("Invalid regex")
}

/// Strategy for a domain name of two to five labels.
pub fn domain_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(label_strategy(), 2..=5).prop_map(|labels| labels.join("."))
}

/// A raw input line as it may appear in a list file.
#[derive(Debug, Clone)]
pub enum RawLine {
    /// A domain with optional surrounding whitespace.
    Domain {
        /// The domain itself.
        name: String,
        /// Whitespace written before the domain.
        leading: String,
        /// Whitespace written after the domain.
        trailing: String,
    },
    /// A line holding only whitespace.
    Blank(String),
}

impl RawLine {
    /// Renders the line as written to the input file.
    pub fn render(&self) -> String {
        match self {
            Self::Domain {
                name,
                leading,
                trailing,
            } => format!("{leading}{name}{trailing}"),
            Self::Blank(space) => space.clone(),
        }
    }

    /// Returns the domain if this line yields an entry.
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::Domain { name, .. } => Some(name),
            Self::Blank(_) => None,
        }
    }
}

fn padding_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \t\n]{0,2}").expect("Invalid regex")
}

/// Strategy for a raw input line; roughly one in five is blank.
pub fn raw_line_strategy() -> impl Strategy<Value = RawLine> {
    prop_oneof![
        4 => (domain_strategy(), padding_strategy(), padding_strategy()).prop_map(
            |(name, leading, trailing)| RawLine::Domain {
                name,
                leading,
                trailing,
            }
        ),
        1 => padding_strategy().prop_map(RawLine::Blank),
    ]
}

/// Strategy for a whole input list of up to `max_lines` raw lines.
pub fn raw_list_strategy(max_lines: usize) -> impl Strategy<Value = Vec<RawLine>> {
    prop::collection::vec(raw_line_strategy(), 0..=max_lines)
}

//! Root-domain reduction for fallback lookups.
//!
//! A query that misses is retried once with its reduced "root" form, so a
//! list containing `example.com` also matches `mail.example.com`. The
//! reduction is a [`RootRule`]; [`rootdomain`] applies the default rule.
//!
//! Every rule is total (never fails, any input), runs in a single scan over
//! the input, and returns a suffix of it. Trailing dots of a fully
//! qualified name are ignored by the label-based rules.

/// Policy for reducing a domain to the form used by fallback lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRule {
    /// Keep the last `n` labels: `a.b.example.com` → `example.com` for `n = 2`.
    KeepLabels(usize),
    /// Drop up to `n` leading labels, never the last one:
    /// `a.b.example.com` → `b.example.com` for `n = 1`.
    StripLabels(usize),
    /// Leave the query unchanged.
    Identity,
}

impl Default for RootRule {
    fn default() -> Self {
        Self::KeepLabels(2)
    }
}

impl RootRule {
    /// Reduces `name` according to this rule.
    ///
    /// Names without a dot come back unchanged and the empty string maps to
    /// itself. A count of zero behaves like [`RootRule::Identity`].
    #[must_use]
    pub fn reduce<'a>(&self, name: &'a str) -> &'a str {
        match *self {
            Self::Identity | Self::KeepLabels(0) | Self::StripLabels(0) => name,
            Self::KeepLabels(n) => {
                let name = name.trim_end_matches('.');
                match name.rmatch_indices('.').nth(n - 1) {
                    Some((dot, _)) => &name[dot + 1..],
                    None => name,
                }
            }
            Self::StripLabels(n) => {
                let name = name.trim_end_matches('.');
                match name.match_indices('.').take(n).last() {
                    Some((dot, _)) => &name[dot + 1..],
                    None => name,
                }
            }
        }
    }
}

/// Reduces `name` with the default rule (keep the last two labels).
///
/// # Example
///
/// ```rust
/// use domstore_core::rootdomain;
///
/// assert_eq!(rootdomain("mail.example.com"), "example.com");
/// assert_eq!(rootdomain("example.com"), "example.com");
/// assert_eq!(rootdomain("localhost"), "localhost");
/// assert_eq!(rootdomain(""), "");
/// ```
#[must_use]
pub fn rootdomain(name: &str) -> &str {
    RootRule::default().reduce(name)
}

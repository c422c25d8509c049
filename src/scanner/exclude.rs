//! Name-based exclusion rules for directory traversal.
//!
//! The walker consults an [`ExcludeRule`] for every directory entry name.
//! An excluded directory is not descended into; an excluded file is not
//! listed.
//!
//! Two rules are provided:
//! - [`NeverExclude`]: the default; every entry is scanned.
//! - [`NamePatterns`]: excludes names matching any of a set of regular
//!   expressions, as configured in the `exclude` key of the config file.

use std::ffi::OsStr;

use regex::RegexSet;

/// Decides whether a directory entry should be skipped.
pub trait ExcludeRule: Send + Sync + std::fmt::Debug {
    /// Returns `true` if the entry named `name` must be skipped.
    fn is_excluded(&self, name: &OsStr) -> bool;
}

/// Rule that never excludes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverExclude;

impl ExcludeRule for NeverExclude {
    fn is_excluded(&self, _name: &OsStr) -> bool {
        false
    }
}

/// Excludes entries whose name matches any configured pattern.
///
/// Patterns are unanchored regular expressions; use `^...$` to match a
/// whole name.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    set: RegexSet,
}

impl NamePatterns {
    /// Compile a pattern set.
    ///
    /// # Errors
    ///
    /// Returns the regex error for the first invalid pattern.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            set: RegexSet::new(patterns)?,
        })
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether the set holds no pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl ExcludeRule for NamePatterns {
    fn is_excluded(&self, name: &OsStr) -> bool {
        self.set.is_match(&name.to_string_lossy())
    }
}

/// Build the rule for a list of configured patterns.
///
/// An empty list yields [`NeverExclude`].
///
/// # Errors
///
/// Returns the regex error for the first invalid pattern.
pub fn rule_from_patterns(patterns: &[String]) -> Result<Box<dyn ExcludeRule>, regex::Error> {
    if patterns.is_empty() {
        return Ok(Box::new(NeverExclude));
    }
    let rule = NamePatterns::new(patterns)?;
    log::debug!("Loaded {} exclusion pattern(s)", rule.len());
    Ok(Box::new(rule))
}

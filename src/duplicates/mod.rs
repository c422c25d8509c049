//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The cascading size / hard-link / hash / fingerprint passes
//! - Duplicate group management
//! - Pipeline orchestration across one or more roots

pub mod filter;
pub mod finder;
pub mod groups;

pub use filter::{run_cascade, CascadeStats};
pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanOutcome, ScanSummary};
pub use groups::{group_runs, total_reclaimable, DuplicateGroup};

//! Duplicate finder orchestrating the detection pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the whole detector for one or more roots:
//! 1. **Validate** - every root must be an existing directory
//! 2. **Walk** - list regular files of all roots into one [`PathArena`]
//! 3. **Records** - stat each listed path
//! 4. **Cascade** - size, hard-link, hashing and fingerprint passes
//!    (see [`crate::duplicates::filter`])
//!
//! # Example
//!
//! ```no_run
//! use filedups::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_pages(4));
//! let outcome = finder.find_duplicates_in_paths(&[PathBuf::from(".")]).unwrap();
//!
//! for group in outcome.groups() {
//!     println!("{}: {} files", group.fingerprint, group.len());
//! }
//! println!("Reclaimable: {}", outcome.summary.reclaimable_display());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::filter::{run_cascade, CascadeStats};
use super::groups::{group_runs, total_reclaimable, DuplicateGroup};
use crate::progress::{ProgressCallback, PHASE_WALK};
use crate::scanner::arena::{DEFAULT_ARENA_INCREMENT, DEFAULT_ARENA_SIZE};
use crate::scanner::hasher::DEFAULT_MAX_PAGES;
use crate::scanner::{
    build_records, ExcludeRule, FileRecord, Hasher, NeverExclude, PathArena, ScanError, Walker,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Maximum 4096-byte pages hashed per file; `<= 0` hashes whole files.
    pub pages: i64,
    /// Initial arena capacity in bytes.
    pub arena_size: usize,
    /// Arena growth step in bytes.
    pub arena_increment: usize,
    /// Name-based exclusion rule for the walker.
    pub exclude: Arc<dyn ExcludeRule>,
    /// Optional progress callback.
    pub progress_callback: Option<Rc<dyn ProgressCallback>>,
}

impl fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderConfig")
            .field("pages", &self.pages)
            .field("arena_size", &self.arena_size)
            .field("arena_increment", &self.arena_increment)
            .field("exclude", &self.exclude)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            pages: DEFAULT_MAX_PAGES,
            arena_size: DEFAULT_ARENA_SIZE,
            arena_increment: DEFAULT_ARENA_INCREMENT,
            exclude: Arc::new(NeverExclude),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the page limit for fingerprinting.
    #[must_use]
    pub fn with_pages(mut self, pages: i64) -> Self {
        self.pages = pages;
        self
    }

    /// Set the arena's initial size and growth step.
    #[must_use]
    pub fn with_arena_sizes(mut self, size: usize, increment: usize) -> Self {
        self.arena_size = size;
        self.arena_increment = increment;
        self
    }

    /// Set the exclusion rule.
    #[must_use]
    pub fn with_exclude_rule(mut self, rule: Arc<dyn ExcludeRule>) -> Self {
        self.exclude = rule;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Rc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Canonical roots in the order they were walked
    pub roots: Vec<PathBuf>,
    /// Regular files listed by the walker
    pub files_listed: usize,
    /// Files still present when stat'ed
    pub records_built: usize,
    /// Files that vanished between listing and stat
    pub vanished: usize,
    /// Candidates after the size pass
    pub after_size: usize,
    /// Candidates after hard-link collapse
    pub after_links: usize,
    /// Files read by the hasher
    pub files_hashed: usize,
    /// Files that could not be fingerprinted
    pub hash_failures: usize,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Files in duplicate groups
    pub duplicate_files: usize,
    /// Bytes freed by keeping one file per group
    pub reclaimable_space: u64,
    /// Arena growth events during the walk
    pub arena_growths: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Non-fatal errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    fn absorb(&mut self, stats: &CascadeStats) {
        self.after_size = stats.after_size;
        self.after_links = stats.after_links;
        self.files_hashed = stats.hashed;
        self.hash_failures = stats.hash_failures;
        self.duplicate_files = stats.duplicates;
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A root does not exist or is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Walking a directory failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Result of a scan: the surviving records and the arena their paths live in.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Storage for every listed path
    pub arena: PathArena,
    /// Duplicate records in `(fingerprint, inode)` order
    pub records: Vec<FileRecord>,
    /// Scan statistics
    pub summary: ScanSummary,
}

impl ScanOutcome {
    /// Duplicate groups, one per run of equal fingerprints.
    #[must_use]
    pub fn groups(&self) -> Vec<DuplicateGroup> {
        group_runs(&self.records)
    }

    /// Resolve the path of `record`.
    #[must_use]
    pub fn path_of(&self, record: &FileRecord) -> PathBuf {
        self.arena.path(record.path).into_owned()
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new(config.pages);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Canonicalize every root, failing on the first that is not a directory.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NotADirectory`] naming the path as given.
    pub fn validate_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>, FinderError> {
        paths
            .iter()
            .map(|path| match path.canonicalize() {
                Ok(canonical) if canonical.is_dir() => Ok(canonical),
                _ => Err(FinderError::NotADirectory(path.clone())),
            })
            .collect()
    }

    /// Find duplicate files under a single root.
    ///
    /// # Errors
    ///
    /// See [`find_duplicates_in_paths`](Self::find_duplicates_in_paths).
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanOutcome, FinderError> {
        self.find_duplicates_in_paths(&[path.to_path_buf()])
    }

    /// Find duplicate files across all `paths`.
    ///
    /// Every root is validated before any walking starts. Files from all
    /// roots share one candidate set, so a file under one root can duplicate
    /// a file under another.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NotADirectory`] for an invalid root and
    /// [`FinderError::Scan`] if any directory cannot be read.
    pub fn find_duplicates_in_paths(&self, paths: &[PathBuf]) -> Result<ScanOutcome, FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            roots: Self::validate_roots(paths)?,
            ..Default::default()
        };

        let mut arena = PathArena::with_sizes(self.config.arena_size, self.config.arena_increment);
        let progress = self.config.progress_callback.as_deref();

        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_WALK, 0);
        }
        for root in &summary.roots {
            log::info!("Scanning {}", root.display());
            let walker = Walker::new(root).with_exclude_rule(Arc::clone(&self.config.exclude));
            summary.files_listed += walker.walk_with_progress(&mut arena, progress)?;
        }
        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_WALK);
        }
        summary.arena_growths = arena.growth_count();

        let set = build_records(&arena);
        summary.records_built = set.records.len();
        summary.vanished = set.vanished.len();
        summary.scan_errors = set.vanished;

        let (records, stats) = run_cascade(set.records, &arena, &self.hasher, progress);
        summary.absorb(&stats);

        let groups = group_runs(&records);
        summary.duplicate_groups = groups.len();
        summary.reclaimable_space = total_reclaimable(&groups);
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Found {} duplicate group(s) in {} files, {} reclaimable",
            summary.duplicate_groups,
            summary.files_listed,
            summary.reclaimable_display()
        );

        Ok(ScanOutcome {
            arena,
            records,
            summary,
        })
    }
}

//! Duplicate groups formed from the surviving records.
//!
//! # Overview
//!
//! After the fingerprint pass the records are ordered by fingerprint, so
//! each maximal run of equal fingerprints is one group. Groups borrow
//! nothing; they hold copies of the records and resolve paths through the
//! arena on demand.
//!
//! # Example
//!
//! ```
//! use filedups::duplicates::group_runs;
//! use filedups::scanner::{FileRecord, Fingerprint, PathArena};
//! use std::path::Path;
//!
//! let mut arena = PathArena::default();
//! let fp = Fingerprint::Digest([1; 16]);
//! let records: Vec<FileRecord> = ["/a", "/b"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, p)| FileRecord {
//!         path: arena.append(Path::new(p)),
//!         device: 1,
//!         inode: i as u64 + 1,
//!         size: 100,
//!         fingerprint: fp,
//!     })
//!     .collect();
//!
//! let groups = group_runs(&records);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].reclaimable(), 100);
//! ```

use std::path::PathBuf;

use crate::scanner::{FileRecord, Fingerprint, PathArena};

/// Files sharing one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// Members in `(fingerprint, inode)` order
    pub members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Size of the first member in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.members.first().map_or(0, |r| r.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.members.iter().map(|r| r.size).sum()
    }

    /// Bytes freed by keeping only the first member.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.total_size().saturating_sub(self.size())
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Member paths resolved through `arena`.
    #[must_use]
    pub fn paths(&self, arena: &PathArena) -> Vec<PathBuf> {
        self.members
            .iter()
            .map(|r| arena.path(r.path).into_owned())
            .collect()
    }
}

/// Split fingerprint-sorted records into groups of equal fingerprint.
///
/// Runs shorter than two records are skipped; after the fingerprint pass
/// there are none.
#[must_use]
pub fn group_runs(records: &[FileRecord]) -> Vec<DuplicateGroup> {
    records
        .chunk_by(|a, b| a.fingerprint == b.fingerprint)
        .filter(|run| run.len() > 1)
        .map(|run| DuplicateGroup {
            fingerprint: run[0].fingerprint,
            members: run.to_vec(),
        })
        .collect()
}

/// Total reclaimable bytes across `groups`.
#[must_use]
pub fn total_reclaimable(groups: &[DuplicateGroup]) -> u64 {
    groups.iter().map(DuplicateGroup::reclaimable).sum()
}

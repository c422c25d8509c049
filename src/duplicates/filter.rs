//! Cascading sort-and-prune passes that narrow file records to duplicates.
//!
//! # Overview
//!
//! Each pass sorts the surviving records and drops those that cannot have
//! a duplicate, producing a new owned list for the next pass:
//!
//! 1. **Size** - sort by `(size, inode)`; drop records whose size differs
//!    from both sorted neighbours, and every empty file.
//! 2. **Hard links** - keep one record per physical file within a size,
//!    drop sizes left with a single record, then sort by inode.
//! 3. **Hashing** - fingerprint each record in inode order, copying the
//!    previous fingerprint when the inode repeats; sort by
//!    `(fingerprint, inode)`.
//! 4. **Fingerprint** - drop records whose fingerprint differs from both
//!    sorted neighbours, and records that could not be fingerprinted.
//!
//! After pass 4 every maximal run of equal fingerprints is one duplicate
//! group of at least two files.
//!
//! All sorts break ties on the remaining identity fields and finally on the
//! path bytes, so the output order depends only on the tree contents.

use std::cmp::Ordering;

use crate::progress::{ProgressCallback, PHASE_HASH};
use crate::scanner::{FileRecord, Fingerprint, Hasher, PathArena};

/// Record counts observed across the passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeStats {
    /// Records entering pass 1
    pub input: usize,
    /// Survivors of the size pass
    pub after_size: usize,
    /// Survivors of the hard-link pass (the records hashed)
    pub after_links: usize,
    /// Files actually read by the hasher
    pub hashed: usize,
    /// Files whose fingerprint is unavailable
    pub hash_failures: usize,
    /// Survivors of the fingerprint pass
    pub duplicates: usize,
}

/// Keep only items whose key equals the key of a sorted neighbour.
///
/// The input must already be sorted so that equal keys are adjacent.
/// Fewer than two items can never contain a pair, so the result is empty.
#[must_use]
pub fn retain_with_equal_neighbor<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    if items.len() < 2 {
        return Vec::new();
    }

    let keys: Vec<K> = items.iter().map(&key).collect();
    let last = keys.len() - 1;
    let keep: Vec<bool> = (0..keys.len())
        .map(|i| (i > 0 && keys[i] == keys[i - 1]) || (i < last && keys[i] == keys[i + 1]))
        .collect();

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

fn cmp_path(a: &FileRecord, b: &FileRecord, arena: &PathArena) -> Ordering {
    arena.bytes(a.path).cmp(arena.bytes(b.path))
}

fn cmp_inode(a: &FileRecord, b: &FileRecord, arena: &PathArena) -> Ordering {
    a.inode
        .cmp(&b.inode)
        .then(a.device.cmp(&b.device))
        .then_with(|| cmp_path(a, b, arena))
}

fn cmp_size_inode(a: &FileRecord, b: &FileRecord, arena: &PathArena) -> Ordering {
    a.size.cmp(&b.size).then_with(|| cmp_inode(a, b, arena))
}

fn cmp_fingerprint_inode(a: &FileRecord, b: &FileRecord, arena: &PathArena) -> Ordering {
    a.fingerprint
        .cmp(&b.fingerprint)
        .then_with(|| cmp_inode(a, b, arena))
}

/// Pass 1: drop files whose size is unique, and empty files.
///
/// The result is sorted by `(size, inode)`.
#[must_use]
pub fn size_pass(mut records: Vec<FileRecord>, arena: &PathArena) -> Vec<FileRecord> {
    records.sort_by(|a, b| cmp_size_inode(a, b, arena));
    let mut survivors = retain_with_equal_neighbor(records, |r| r.size);
    survivors.retain(|r| r.size > 0);
    survivors
}

/// Pass 2: keep one record per physical file within each size.
///
/// Expects the `(size, inode)` order produced by [`size_pass`]. The path
/// that sorts first represents its inode. Sizes reduced to one record are
/// dropped, since a lone file has nothing to match. The result is sorted
/// by inode.
#[must_use]
pub fn hard_link_pass(mut records: Vec<FileRecord>, arena: &PathArena) -> Vec<FileRecord> {
    let before = records.len();
    records.dedup_by(|later, first| later.size == first.size && later.same_file(first));
    if records.len() < before {
        log::debug!("Collapsed {} hard-link alias(es)", before - records.len());
    }

    let mut survivors = retain_with_equal_neighbor(records, |r| r.size);
    survivors.sort_by(|a, b| cmp_inode(a, b, arena));
    survivors
}

/// Result of the hashing pass.
#[derive(Debug, Default)]
pub struct HashedRecords {
    /// Records with fingerprints, sorted by `(fingerprint, inode)`
    pub records: Vec<FileRecord>,
    /// Files actually read
    pub hashed: usize,
    /// Records left with [`Fingerprint::Unavailable`]
    pub failures: usize,
}

/// Pass 3: fingerprint every record.
///
/// Expects inode order. A record with the same physical file as its
/// predecessor reuses the predecessor's fingerprint instead of reading the
/// file again. Inside [`run_cascade`] that never happens, because
/// [`hard_link_pass`] has already collapsed aliases; it matters only to
/// callers that skip the collapse.
#[must_use]
pub fn hash_pass(
    mut records: Vec<FileRecord>,
    arena: &PathArena,
    hasher: &Hasher,
    progress: Option<&dyn ProgressCallback>,
) -> HashedRecords {
    let mut hashed = 0;
    let mut failures = 0;

    if let Some(cb) = progress {
        cb.on_phase_start(PHASE_HASH, records.len());
    }

    let mut previous: Option<FileRecord> = None;
    for (index, record) in records.iter_mut().enumerate() {
        let path = arena.path(record.path);
        record.fingerprint = match previous {
            Some(prev) if prev.same_file(record) => prev.fingerprint,
            _ => {
                hashed += 1;
                hasher.fingerprint_or_unavailable(&path)
            }
        };
        if record.fingerprint == Fingerprint::Unavailable {
            failures += 1;
        }
        if let Some(cb) = progress {
            cb.on_progress(index + 1, &path.to_string_lossy());
        }
        previous = Some(*record);
    }

    if let Some(cb) = progress {
        cb.on_phase_end(PHASE_HASH);
    }

    records.sort_by(|a, b| cmp_fingerprint_inode(a, b, arena));
    HashedRecords {
        records,
        hashed,
        failures,
    }
}

/// Pass 4: drop records whose fingerprint is unique or unavailable.
///
/// Expects the `(fingerprint, inode)` order produced by [`hash_pass`],
/// which the result keeps.
#[must_use]
pub fn fingerprint_pass(records: Vec<FileRecord>) -> Vec<FileRecord> {
    let mut survivors = retain_with_equal_neighbor(records, |r| r.fingerprint);
    survivors.retain(|r| r.fingerprint.is_available());
    survivors
}

/// Run all four passes.
#[must_use]
pub fn run_cascade(
    records: Vec<FileRecord>,
    arena: &PathArena,
    hasher: &Hasher,
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<FileRecord>, CascadeStats) {
    let mut stats = CascadeStats {
        input: records.len(),
        ..Default::default()
    };

    let records = size_pass(records, arena);
    stats.after_size = records.len();
    log::debug!(
        "Size pass: {} of {} records remain",
        stats.after_size,
        stats.input
    );

    let records = hard_link_pass(records, arena);
    stats.after_links = records.len();
    log::debug!("Hard-link pass: {} records to fingerprint", stats.after_links);

    let hashed = hash_pass(records, arena, hasher, progress);
    stats.hashed = hashed.hashed;
    stats.hash_failures = hashed.failures;

    let records = fingerprint_pass(hashed.records);
    stats.duplicates = records.len();
    log::debug!(
        "Fingerprint pass: {} duplicate records remain",
        stats.duplicates
    );

    (records, stats)
}

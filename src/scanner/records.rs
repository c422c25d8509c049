//! File records built from the listed paths.
//!
//! Every path in the [`PathArena`] is stat'ed once. The resulting
//! [`FileRecord`] carries the size and inode the filter passes sort on.
//! A file that vanished between listing and stat is logged and dropped;
//! on a live tree (browser caches, build directories) that is routine.

use std::fmt;
use std::fs::{self, Metadata};
use std::path::Path;

use super::arena::{ArenaSpan, PathArena};
use super::ScanError;

/// Content fingerprint of a file.
///
/// Ordering places [`Fingerprint::Unavailable`] before every digest, which
/// matches the serialized form (an empty field sorts before any hex text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Fingerprint {
    /// Not computed yet
    #[default]
    Pending,
    /// The file could not be read when it was fingerprinted
    Unavailable,
    /// 128-bit MD5 digest
    Digest([u8; 16]),
}

impl Fingerprint {
    /// The digest bytes, if computed.
    #[must_use]
    pub fn digest(&self) -> Option<&[u8; 16]> {
        match self {
            Self::Digest(d) => Some(d),
            _ => None,
        }
    }

    /// Whether a digest is present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Digest(_))
    }

    /// Lowercase hex form, or an empty string when no digest exists.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Digest(bytes) = self {
            for b in bytes {
                write!(f, "{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// One discovered regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRecord {
    /// Location of the path in the arena
    pub path: ArenaSpan,
    /// Device holding the file (0 where the platform has no such notion)
    pub device: u64,
    /// Inode number, shared by hard-linked paths
    pub inode: u64,
    /// Size in bytes at stat time
    pub size: u64,
    /// Content fingerprint
    pub fingerprint: Fingerprint,
}

impl FileRecord {
    /// Whether `other` refers to the same physical file.
    #[must_use]
    pub fn same_file(&self, other: &Self) -> bool {
        self.inode == other.inode && self.device == other.device
    }
}

/// Records built from an arena, plus the files that vanished.
#[derive(Debug, Default)]
pub struct RecordSet {
    /// One record per file still present
    pub records: Vec<FileRecord>,
    /// Stat failures, one per dropped path
    pub vanished: Vec<ScanError>,
}

/// Stat every listed path and build its record.
///
/// Paths whose stat fails are left out and reported in
/// [`RecordSet::vanished`].
#[must_use]
pub fn build_records(arena: &PathArena) -> RecordSet {
    let mut set = RecordSet {
        records: Vec::with_capacity(arena.len()),
        vanished: Vec::new(),
    };

    for (index, span) in arena.spans().enumerate() {
        let path = arena.path(span);
        match fs::metadata(&path) {
            Ok(metadata) => {
                let (device, inode) = file_identity(&metadata, index);
                set.records.push(FileRecord {
                    path: span,
                    device,
                    inode,
                    size: metadata.len(),
                    fingerprint: Fingerprint::Pending,
                });
            }
            Err(e) => {
                log::warn!("File disappeared: {} ({})", path.display(), e);
                set.vanished.push(stat_error(&path, e));
            }
        }
    }

    log::debug!(
        "Built {} file records ({} vanished)",
        set.records.len(),
        set.vanished.len()
    );
    set
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata, _index: usize) -> (u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.ino())
}

// Without inode numbers every path counts as its own file.
#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata, index: usize) -> (u64, u64) {
    (0, index as u64 + 1)
}

fn stat_error(path: &Path, error: std::io::Error) -> ScanError {
    match error.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
        _ => ScanError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fingerprint_display() {
        let fp = Fingerprint::Digest([
            0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1,
            0x7f, 0x72,
        ]);
        assert_eq!(fp.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(Fingerprint::Unavailable.to_hex(), "");
        assert_eq!(Fingerprint::Pending.to_hex(), "");
    }

    #[test]
    fn test_fingerprint_ordering_matches_hex() {
        let low = Fingerprint::Digest([0x0f; 16]);
        let high = Fingerprint::Digest([0xf0; 16]);
        assert!(Fingerprint::Unavailable < low);
        assert!(low < high);
        assert!(low.to_hex() < high.to_hex());
    }

    #[test]
    fn test_build_records() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), b"12345").unwrap();
        fs::write(dir.path().join("b"), b"").unwrap();

        let mut arena = PathArena::default();
        arena.append(&dir.path().join("a"));
        arena.append(&dir.path().join("b"));

        let set = build_records(&arena);
        assert!(set.vanished.is_empty());
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[0].size, 5);
        assert_eq!(set.records[1].size, 0);
        assert_eq!(set.records[0].fingerprint, Fingerprint::Pending);
        assert!(!set.records[0].same_file(&set.records[1]));
    }

    #[test]
    fn test_vanished_file_is_dropped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kept"), b"data").unwrap();

        let mut arena = PathArena::default();
        arena.append(&dir.path().join("gone"));
        arena.append(&dir.path().join("kept"));

        let set = build_records(&arena);
        assert_eq!(set.records.len(), 1);
        assert_eq!(arena.path(set.records[0].path), dir.path().join("kept"));
        assert_eq!(set.vanished.len(), 1);
        assert!(matches!(set.vanished[0], ScanError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_links_share_identity() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("original");
        fs::write(&original, b"shared").unwrap();
        fs::hard_link(&original, dir.path().join("alias")).unwrap();

        let mut arena = PathArena::default();
        arena.append(&original);
        arena.append(&dir.path().join("alias"));

        let set = build_records(&arena);
        assert!(set.records[0].same_file(&set.records[1]));
    }
}

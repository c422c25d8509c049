//! Permanent file deletion for resolved duplicate groups.
//!
//! # Overview
//!
//! Files are unlinked directly; there is no trash. A batch keeps going
//! after a failed removal, since the listed files may have changed since
//! the scan and a partial result is still useful.
//!
//! # Example
//!
//! ```no_run
//! use filedups::actions::delete::delete_batch;
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/tmp/dup1"), PathBuf::from("/tmp/dup2")];
//! let result = delete_batch(&paths);
//! println!("{}", result.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path being removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Results of a batch deletion.
#[derive(Debug, Default)]
pub struct BatchDeleteResult {
    /// Paths removed.
    pub deleted: Vec<PathBuf>,
    /// Failed removals.
    pub failures: Vec<DeleteError>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.deleted.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Permanently delete one file, returning its size.
///
/// # Errors
///
/// Returns [`DeleteError`] if the file cannot be stat'ed or removed.
pub fn permanent_delete(path: &Path) -> Result<u64, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Delete every path, continuing past failures.
#[must_use]
pub fn delete_batch(paths: &[PathBuf]) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for path in paths {
        match permanent_delete(path) {
            Ok(size) => {
                result.bytes_freed += size;
                result.deleted.push(path.clone());
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                result.failures.push(e);
            }
        }
    }

    log::info!("{}", result.summary());
    result
}

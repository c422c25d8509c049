//! Replacing duplicate files with hard links to one kept copy.
//!
//! The first member of a group is authoritative. Every other member whose
//! inode differs is replaced by a hard link to the authoritative file.
//! Members already sharing the inode are left alone. A failure on one member
//! is logged and the batch moves on.
//!
//! The link is created under a temporary sibling name and renamed over the
//! member, so a member is never left missing when linking fails. If the
//! authoritative file is gone, the whole group is left untouched.
//!
//! The list carries inode numbers but no device, so two members on different
//! filesystems with equal inode numbers count as already linked.
//!
//! # Example
//!
//! ```no_run
//! use filedups::actions::link::link_batch;
//! use std::path::PathBuf;
//!
//! let keep = (PathBuf::from("/data/a"), 11);
//! let others = vec![(PathBuf::from("/data/b"), 12)];
//! let result = link_batch(&keep.0, keep.1, &others);
//! println!("{}", result.summary());
//! ```

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::delete::DeleteError;

/// Suffix of the temporary link created next to a member.
const TEMP_SUFFIX: &str = ".filedups-link";

/// Error type for hard-link replacement.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The duplicate is not there to be replaced.
    #[error("cannot replace duplicate: {0}")]
    Member(#[from] DeleteError),

    /// The authoritative file is unavailable; the member was left as is.
    #[error("cannot link {path}: {target} is unavailable: {source}")]
    Authority {
        /// Member that was not replaced
        path: PathBuf,
        /// Authoritative file
        target: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The link could not be created or moved into place.
    #[error("cannot link {path} to {target}: {source}")]
    Link {
        /// Path that should have become a link
        path: PathBuf,
        /// Authoritative file
        target: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Results of linking one group.
#[derive(Debug, Default)]
pub struct BatchLinkResult {
    /// Paths now hard-linked to the authoritative file.
    pub linked: Vec<PathBuf>,
    /// Members that already shared the authoritative inode.
    pub already_linked: usize,
    /// Failed replacements.
    pub failures: Vec<LinkError>,
}

impl BatchLinkResult {
    /// Check if all replacements succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("Linked {} file(s)", self.linked.len());
        if self.already_linked > 0 {
            text.push_str(&format!(", {} already linked", self.already_linked));
        }
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} failed", self.failures.len()));
        }
        text
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Replace `path` with a hard link to `target`.
///
/// `path` keeps its old contents unless the link is in place.
///
/// # Errors
///
/// Returns [`LinkError::Member`] if `path` does not exist, or
/// [`LinkError::Link`] if the link cannot be created or renamed over it.
pub fn replace_with_hardlink(path: &Path, target: &Path) -> Result<(), LinkError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    let link_error = |source: io::Error| LinkError::Link {
        path: path.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };
    let temp = temp_sibling(path);
    fs::hard_link(target, &temp).map_err(link_error)?;
    if let Err(source) = fs::rename(&temp, path) {
        if let Err(e) = fs::remove_file(&temp) {
            log::error!("Could not remove temporary link {}: {}", temp.display(), e);
        }
        return Err(link_error(source));
    }

    log::info!("Linked: {} -> {}", path.display(), target.display());
    Ok(())
}

/// Link every member of `others` to `authority`, skipping members whose
/// inode already equals `authority_inode`.
///
/// Nothing is touched when `authority` cannot be stat'ed; each member that
/// would have been linked is reported as a failure instead.
#[must_use]
pub fn link_batch(authority: &Path, authority_inode: u64, others: &[(PathBuf, u64)]) -> BatchLinkResult {
    let mut result = BatchLinkResult::default();
    let authority_state = fs::metadata(authority);

    for (path, inode) in others {
        if *inode == authority_inode {
            log::debug!("Already linked: {}", path.display());
            result.already_linked += 1;
            continue;
        }

        let outcome = match &authority_state {
            Ok(_) => replace_with_hardlink(path, authority),
            Err(e) => Err(LinkError::Authority {
                path: path.clone(),
                target: authority.to_path_buf(),
                source: io::Error::new(e.kind(), e.to_string()),
            }),
        };
        match outcome {
            Ok(()) => result.linked.push(path.clone()),
            Err(e) => {
                log::warn!("{}", e);
                result.failures.push(e);
            }
        }
    }

    log::info!("{}", result.summary());
    result
}

//! Directory walker that lists regular files into a [`PathArena`].
//!
//! # Overview
//!
//! The [`Walker`] recurses depth-first through one directory tree using
//! [`walkdir`] and appends the path of every regular file to a
//! [`PathArena`]. Symlinks, devices, sockets and other non-regular entries
//! are skipped silently. Each entry name is checked against an
//! [`ExcludeRule`]; excluded directories are pruned without being opened.
//!
//! A directory that cannot be read aborts the walk: a partial listing would
//! make files look unique when their copies simply went unseen.
//!
//! # Example
//!
//! ```no_run
//! use filedups::scanner::{PathArena, Walker};
//! use std::path::Path;
//!
//! let mut arena = PathArena::default();
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! let listed = walker.walk_into(&mut arena).unwrap();
//! println!("Listed {} files", listed);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::arena::PathArena;
use super::exclude::{ExcludeRule, NeverExclude};
use super::ScanError;
use crate::progress::ProgressCallback;

/// Depth-first lister of regular files.
#[derive(Debug)]
pub struct Walker {
    /// Root directory to walk
    root: PathBuf,
    /// Name-based exclusion rule
    exclude: Arc<dyn ExcludeRule>,
}

impl Walker {
    /// Create a walker for `root` that excludes nothing.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            exclude: Arc::new(NeverExclude),
        }
    }

    /// Use `rule` to skip directory entries by name.
    #[must_use]
    pub fn with_exclude_rule(mut self, rule: Arc<dyn ExcludeRule>) -> Self {
        self.exclude = rule;
        self
    }

    /// The root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and append every regular file path to `arena`.
    ///
    /// Returns the number of paths appended.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root or any directory below it cannot be
    /// opened or read.
    pub fn walk_into(&self, arena: &mut PathArena) -> Result<usize, ScanError> {
        self.walk_with_progress(arena, None)
    }

    /// Like [`walk_into`](Self::walk_into), reporting each listed file.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if a directory cannot be read.
    pub fn walk_with_progress(
        &self,
        arena: &mut PathArena,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<usize, ScanError> {
        let mut listed = 0;
        let exclude = Arc::clone(&self.exclude);

        let entries = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| {
                // the root is never matched against the rule
                entry.depth() == 0 || !exclude.is_excluded(entry.file_name())
            });

        for entry in entries {
            let entry = entry.map_err(|e| self.handle_walk_error(e))?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                log::trace!("Entering directory: {}", entry.path().display());
                continue;
            }
            if !file_type.is_file() {
                log::trace!("Skipping non-regular entry: {}", entry.path().display());
                continue;
            }

            arena.append(entry.path());
            listed += 1;
            if let Some(cb) = progress {
                cb.on_progress(listed, &entry.path().to_string_lossy());
            }
        }

        log::debug!("Listed {} regular files under {}", listed, self.root.display());
        Ok(listed)
    }

    /// Convert a walkdir error into a fatal [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.into_io_error() {
            Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                log::error!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                log::error!("Directory not found: {}", path.display());
                ScanError::NotFound(path)
            }
            Some(io) => {
                log::error!("Cannot read {}: {}", path.display(), io);
                ScanError::Io { path, source: io }
            }
            None => {
                log::error!("Filesystem loop detected at {}", path.display());
                ScanError::Io {
                    path,
                    source: std::io::Error::other("filesystem loop"),
                }
            }
        }
    }
}

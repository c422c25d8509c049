//! Scanner module for directory traversal, file records and fingerprinting.
//!
//! This module provides functionality for:
//! - Depth-first directory walking into a contiguous path arena
//! - Name-based exclusion rules
//! - Building size/inode records from the listed paths
//! - MD5 content fingerprinting, optionally limited to the first pages
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`arena`]: append-only storage for listed paths
//! - [`walker`]: directory traversal and file discovery
//! - [`exclude`]: exclusion rules consulted by the walker
//! - [`records`]: stat of listed paths into [`FileRecord`]s
//! - [`hasher`]: MD5 fingerprinting
//!
//! # Example
//!
//! ```no_run
//! use filedups::scanner::{build_records, PathArena, Walker};
//! use std::path::Path;
//!
//! let mut arena = PathArena::default();
//! Walker::new(Path::new(".")).walk_into(&mut arena).unwrap();
//!
//! let set = build_records(&arena);
//! for record in &set.records {
//!     println!("{}: {} bytes", arena.path(record.path).display(), record.size);
//! }
//! ```

pub mod arena;
pub mod exclude;
pub mod hasher;
pub mod path_utils;
pub mod records;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use arena::{ArenaSpan, PathArena};
pub use exclude::{ExcludeRule, NamePatterns, NeverExclude};
pub use hasher::{Hasher, HASH_PAGE_SIZE};
pub use records::{build_records, FileRecord, Fingerprint, RecordSet};
pub use walker::Walker;

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file fingerprinting.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

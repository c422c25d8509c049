//! MD5 content fingerprinting with an optional page limit.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in 4096-byte pages and feeds them to MD5. With a
//! positive page limit only the first `max_pages` pages are read, which makes
//! fingerprinting of large files cheap at the cost of accuracy: two large
//! files that agree on their first `max_pages * 4096` bytes get the same
//! fingerprint even if they differ later. Files shorter than the limit are
//! hashed whole. A limit of zero or less hashes every file completely.
//!
//! MD5 is used only to cluster candidates; it is not a security primitive.
//!
//! # Example
//!
//! ```no_run
//! use filedups::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new(1);
//! let fp = hasher.fingerprint(Path::new("some_file.bin")).unwrap();
//! println!("{}", fp);
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::records::Fingerprint;
use super::HashError;

/// Size of one hashing page in bytes.
pub const HASH_PAGE_SIZE: usize = 4096;

/// Default page limit.
pub const DEFAULT_MAX_PAGES: i64 = 1;

/// File fingerprinter.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    max_pages: i64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

impl Hasher {
    /// Create a hasher reading at most `max_pages` pages per file.
    ///
    /// `max_pages <= 0` hashes whole files.
    #[must_use]
    pub fn new(max_pages: i64) -> Self {
        Self { max_pages }
    }

    /// Hasher that always reads whole files.
    #[must_use]
    pub fn full() -> Self {
        Self::new(0)
    }

    /// Configured page limit.
    #[must_use]
    pub fn max_pages(&self) -> i64 {
        self.max_pages
    }

    /// Byte limit per file, or `None` for whole files.
    #[must_use]
    pub fn byte_limit(&self) -> Option<u64> {
        u64::try_from(self.max_pages)
            .ok()
            .filter(|&pages| pages > 0)
            .map(|pages| pages.saturating_mul(HASH_PAGE_SIZE as u64))
    }

    /// Fingerprint the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| hash_error(path, e))?;
        let digest = match self.byte_limit() {
            Some(limit) => digest_reader(file.take(limit)),
            None => digest_reader(file),
        }
        .map_err(|e| hash_error(path, e))?;
        Ok(Fingerprint::Digest(digest))
    }

    /// Fingerprint the file, logging failures and returning
    /// [`Fingerprint::Unavailable`] instead of an error.
    #[must_use]
    pub fn fingerprint_or_unavailable(&self, path: &Path) -> Fingerprint {
        match self.fingerprint(path) {
            Ok(fp) => fp,
            Err(e) => {
                log::warn!("{}", e);
                Fingerprint::Unavailable
            }
        }
    }
}

/// Hash everything `reader` yields, one page at a time.
fn digest_reader<R: Read>(mut reader: R) -> io::Result<[u8; 16]> {
    let mut hasher = Md5::new();
    let mut buffer = [0u8; HASH_PAGE_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}

fn hash_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

//! Append-only path arena.
//!
//! # Overview
//!
//! A scan can list millions of paths. Instead of one heap allocation per
//! path, [`PathArena`] stores every path back-to-back in a single growable
//! byte buffer, each terminated by a NUL byte. Callers keep an [`ArenaSpan`]
//! (offset and length from the buffer start), never a pointer, so a span
//! stays valid across any number of reallocations.
//!
//! Growth follows a fixed policy: the buffer grows by the configured
//! increment whenever the spare capacity would drop below the string length
//! plus an 8-byte safety margin, and by more than one increment when a
//! single path is larger than the increment.
//!
//! # Example
//!
//! ```
//! use filedups::scanner::PathArena;
//! use std::path::Path;
//!
//! let mut arena = PathArena::with_sizes(4096, 4096);
//! let span = arena.append(Path::new("/tmp/a.txt"));
//! assert_eq!(arena.path(span), Path::new("/tmp/a.txt"));
//! assert_eq!(arena.len(), 1);
//! ```

use std::borrow::Cow;
use std::path::Path;

use super::path_utils::{path_as_bytes, path_from_bytes};

/// Allocation granularity for arena sizes.
pub const PAGE_SIZE: usize = 4096;

/// Spare bytes that must remain past a new string before the arena grows.
pub const SAFETY_MARGIN: usize = 8;

/// Default initial arena size (1 MiB).
pub const DEFAULT_ARENA_SIZE: usize = 1024 * 1024;

/// Default growth increment (a tenth of the default size, page aligned).
pub const DEFAULT_ARENA_INCREMENT: usize = round_to_page(DEFAULT_ARENA_SIZE / 10);

/// Round a byte count up to a whole number of pages (minimum one page).
#[must_use]
pub const fn round_to_page(bytes: usize) -> usize {
    if bytes == 0 {
        PAGE_SIZE
    } else {
        bytes.div_ceil(PAGE_SIZE) * PAGE_SIZE
    }
}

/// Location of one path inside a [`PathArena`].
///
/// `len` excludes the NUL terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaSpan {
    /// Byte offset of the first path byte from the arena start
    pub offset: usize,
    /// Path length in bytes
    pub len: usize,
}

/// Contiguous, append-only storage for NUL-terminated path strings.
#[derive(Debug, Clone)]
pub struct PathArena {
    buf: Vec<u8>,
    increment: usize,
    count: usize,
    growths: usize,
}

impl Default for PathArena {
    fn default() -> Self {
        Self::with_sizes(DEFAULT_ARENA_SIZE, DEFAULT_ARENA_INCREMENT)
    }
}

impl PathArena {
    /// Create an arena with the given initial size and growth increment.
    ///
    /// Both values are rounded up to a multiple of [`PAGE_SIZE`].
    #[must_use]
    pub fn with_sizes(initial: usize, increment: usize) -> Self {
        Self {
            buf: Vec::with_capacity(round_to_page(initial)),
            increment: round_to_page(increment),
            count: 0,
            growths: 0,
        }
    }

    /// Append a copy of `path` followed by a NUL terminator.
    pub fn append(&mut self, path: &Path) -> ArenaSpan {
        let bytes = path_as_bytes(path);
        self.append_bytes(&bytes)
    }

    fn append_bytes(&mut self, bytes: &[u8]) -> ArenaSpan {
        debug_assert!(!bytes.contains(&0), "paths never contain NUL");

        let len = bytes.len();
        let available = self.buf.capacity() - self.buf.len();
        if len + SAFETY_MARGIN > available {
            let mut addon = self.increment;
            while len + SAFETY_MARGIN > addon {
                addon += len;
            }
            let new_capacity = self.buf.capacity() + addon;
            self.buf.reserve_exact(new_capacity - self.buf.len());
            self.growths += 1;
            log::trace!(
                "Path arena grown to {} bytes ({} paths stored)",
                self.buf.capacity(),
                self.count
            );
        }

        let offset = self.buf.len();
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        self.count += 1;
        ArenaSpan { offset, len }
    }

    /// Raw bytes of the path at `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` did not come from this arena.
    #[must_use]
    pub fn bytes(&self, span: ArenaSpan) -> &[u8] {
        &self.buf[span.offset..span.offset + span.len]
    }

    /// The path at `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` did not come from this arena.
    #[must_use]
    pub fn path(&self, span: ArenaSpan) -> Cow<'_, Path> {
        path_from_bytes(self.bytes(span))
    }

    /// Iterate over every stored path in insertion order.
    pub fn spans(&self) -> impl Iterator<Item = ArenaSpan> + '_ {
        let mut offset = 0;
        self.buf
            .split(|&b| b == 0)
            .take(self.count)
            .map(move |segment| {
                let span = ArenaSpan {
                    offset,
                    len: segment.len(),
                };
                offset += segment.len() + 1;
                span
            })
    }

    /// Number of paths stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no path has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes in use, terminators included.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Number of times the arena has grown past its initial allocation.
    #[must_use]
    pub fn growth_count(&self) -> usize {
        self.growths
    }
}

//! Tab-separated duplicate list shared by the detector and the resolver.
//!
//! # Format
//!
//! One line per duplicate record, in final `(fingerprint, inode)` order:
//!
//! ```text
//! fingerprint<TAB>inode<TAB>size<TAB>path<LF>
//! ```
//!
//! - `fingerprint`: 32 lowercase hex characters, or empty when the file could
//!   not be read
//! - `inode`, `size`: decimal unsigned integers
//! - `path`: the file path as raw bytes; it may contain tabs but not newlines
//!
//! Parsing splits each line into at most four fields, so only the path can
//! carry a tab. A line with fewer than four fields is rejected. The file is
//! always rewritten whole.
//!
//! # Example
//!
//! ```
//! use filedups::output::list::{parse_list, SerializedRecord};
//!
//! let text = b"900150983cd24fb0d6963f7d28e17f72\t12\t3\t/tmp/abc\n";
//! let records = parse_list(text).unwrap();
//! assert_eq!(records[0].inode, 12);
//! assert_eq!(records[0].path.to_str(), Some("/tmp/abc"));
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scanner::path_utils::{is_line_safe, path_as_bytes, path_from_bytes};
use crate::scanner::{FileRecord, PathArena};

/// File written by the detector.
pub const DUPLICATES_LIST: &str = "duplicates.lst";

/// File written by the resolver's save action.
pub const REWRITE_LIST: &str = "dups.lst";

/// Hex length of a serialized fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// Errors that can occur while reading or writing a list.
#[derive(Debug, Error)]
pub enum ListError {
    /// The list file could not be opened, read or written.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// List file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A line did not have four tab-separated fields.
    #[error("line {line}: expected 4 tab-separated fields, found {found}")]
    MissingFields {
        /// 1-based line number
        line: usize,
        /// Fields present
        found: usize,
    },

    /// The inode or size field is not a decimal integer.
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// Field name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// The fingerprint field is neither empty nor 32 lowercase hex digits.
    #[error("line {line}: invalid fingerprint '{value}'")]
    InvalidFingerprint {
        /// 1-based line number
        line: usize,
        /// Offending text
        value: String,
    },
}

/// One parsed line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedRecord {
    /// Lowercase hex fingerprint, empty if unavailable
    pub fingerprint: String,
    /// Inode number
    pub inode: u64,
    /// Size in bytes
    pub size: u64,
    /// File path
    pub path: PathBuf,
}

impl SerializedRecord {
    /// Snapshot a file record, resolving its path through `arena`.
    #[must_use]
    pub fn from_record(record: &FileRecord, arena: &PathArena) -> Self {
        Self {
            fingerprint: record.fingerprint.to_hex(),
            inode: record.inode,
            size: record.size,
            path: arena.path(record.path).into_owned(),
        }
    }

    /// Write this record as one line.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_line<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}\t{}\t{}\t", self.fingerprint, self.inode, self.size)?;
        writer.write_all(&path_as_bytes(&self.path))?;
        writer.write_all(b"\n")
    }

    /// Parse one line without its terminating newline.
    ///
    /// # Errors
    ///
    /// Returns [`ListError`] if the line is malformed; `line` is used in the
    /// message.
    pub fn parse_line(bytes: &[u8], line: usize) -> Result<Self, ListError> {
        let fields: Vec<&[u8]> = bytes.splitn(4, |&b| b == b'\t').collect();
        let &[fingerprint, inode, size, path] = fields.as_slice() else {
            return Err(ListError::MissingFields {
                line,
                found: fields.len(),
            });
        };

        let fingerprint = String::from_utf8_lossy(fingerprint).into_owned();
        if !is_valid_fingerprint(&fingerprint) {
            return Err(ListError::InvalidFingerprint {
                line,
                value: fingerprint,
            });
        }

        Ok(Self {
            fingerprint,
            inode: parse_number(inode, "inode", line)?,
            size: parse_number(size, "size", line)?,
            path: path_from_bytes(path).into_owned(),
        })
    }
}

fn is_valid_fingerprint(text: &str) -> bool {
    text.is_empty()
        || (text.len() == FINGERPRINT_HEX_LEN
            && text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')))
}

fn parse_number(field: &[u8], name: &'static str, line: usize) -> Result<u64, ListError> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ListError::InvalidNumber {
            line,
            field: name,
            value: String::from_utf8_lossy(field).into_owned(),
        })
}

/// Write file records as list lines.
///
/// Records whose path contains a newline cannot be represented and are
/// skipped with a warning. Returns the number of lines written.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[FileRecord],
    arena: &PathArena,
) -> io::Result<usize> {
    let mut written = 0;
    for record in records {
        if !is_line_safe(arena.bytes(record.path)) {
            log::warn!(
                "Skipping path with newline: {}",
                arena.path(record.path).display()
            );
            continue;
        }
        SerializedRecord::from_record(record, arena).write_line(writer)?;
        written += 1;
    }
    Ok(written)
}

/// Write parsed records back out.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn write_serialized<W: Write>(writer: &mut W, records: &[SerializedRecord]) -> io::Result<()> {
    records.iter().try_for_each(|r| r.write_line(writer))
}

/// Create or truncate `path` and fill it with `fill`.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be created or written.
pub fn write_list_file<T, F>(path: &Path, fill: F) -> Result<T, ListError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<T>,
{
    let io_error = |source| ListError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let value = fill(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    Ok(value)
}

/// Parse a whole list.
///
/// Empty lines are ignored.
///
/// # Errors
///
/// Returns the first [`ListError`] encountered.
pub fn parse_list(bytes: &[u8]) -> Result<Vec<SerializedRecord>, ListError> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| SerializedRecord::parse_line(line, index + 1))
        .collect()
}

/// Read and parse the list at `path`.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be read, or a parse error.
pub fn read_list(path: &Path) -> Result<Vec<SerializedRecord>, ListError> {
    let bytes = std::fs::read(path).map_err(|source| ListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_list(&bytes)
}

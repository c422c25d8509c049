//! Conversions between paths and raw bytes.
//!
//! The path arena and the duplicate list both store paths as bytes. On Unix
//! a path is an arbitrary byte string without NUL, so the conversion is
//! lossless in both directions. Elsewhere the platform's encoded bytes are
//! used for storage and decoding goes through UTF-8.
//!
//! # Example
//!
//! ```
//! use filedups::scanner::path_utils::{path_as_bytes, path_from_bytes};
//! use std::path::Path;
//!
//! let bytes = path_as_bytes(Path::new("/tmp/a.txt"));
//! assert_eq!(&*bytes, b"/tmp/a.txt");
//! assert_eq!(path_from_bytes(&bytes), Path::new("/tmp/a.txt"));
//! ```

use std::borrow::Cow;
use std::path::Path;

/// Borrow the bytes of a path.
#[cfg(unix)]
#[must_use]
pub fn path_as_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

/// Borrow the bytes of a path.
#[cfg(not(unix))]
#[must_use]
pub fn path_as_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Borrowed(path.as_os_str().as_encoded_bytes())
}

/// Reinterpret bytes as a path.
#[cfg(unix)]
#[must_use]
pub fn path_from_bytes(bytes: &[u8]) -> Cow<'_, Path> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
}

/// Reinterpret bytes as a path.
#[cfg(not(unix))]
#[must_use]
pub fn path_from_bytes(bytes: &[u8]) -> Cow<'_, Path> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(Path::new(s)),
        Err(_) => Cow::Owned(String::from_utf8_lossy(bytes).into_owned().into()),
    }
}

/// Whether a byte string can be stored as one line of the duplicate list.
#[must_use]
pub fn is_line_safe(bytes: &[u8]) -> bool {
    !bytes.contains(&b'\n')
}

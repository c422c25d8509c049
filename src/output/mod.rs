//! Serialization of scan results.
//!
//! The detector writes its duplicates as a tab-separated list (see
//! [`list`]), which the resolver later reads back.
//!
//! # Example
//!
//! ```no_run
//! use filedups::duplicates::DuplicateFinder;
//! use filedups::output::list::{write_list_file, write_records, DUPLICATES_LIST};
//! use std::path::Path;
//!
//! let outcome = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! write_list_file(Path::new(DUPLICATES_LIST), |w| {
//!     write_records(w, &outcome.records, &outcome.arena)
//! })
//! .unwrap();
//! ```

pub mod list;

pub use list::{
    parse_list, read_list, write_list_file, write_records, write_serialized, ListError,
    SerializedRecord, DUPLICATES_LIST, REWRITE_LIST,
};

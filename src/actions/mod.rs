//! File actions module.
//!
//! This module provides the bulk actions the resolver applies to a
//! duplicate group:
//! - Permanent deletion of every listed path ([`delete`])
//! - Replacement of duplicates by hard links to one kept copy ([`link`])
//!
//! Both continue past individual failures and report them in a batch
//! result.
//!
//! ```no_run
//! use filedups::actions::delete::delete_batch;
//! use std::path::PathBuf;
//!
//! let result = delete_batch(&[PathBuf::from("/path/to/duplicate.txt")]);
//! println!("{}", result.summary());
//! ```

pub mod delete;
pub mod link;

// Re-export commonly used types
pub use delete::{delete_batch, permanent_delete, BatchDeleteResult, DeleteError};
pub use link::{link_batch, replace_with_hardlink, BatchLinkResult, LinkError};

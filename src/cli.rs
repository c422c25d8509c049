//! Command-line interface definitions for the detector and the resolver.
//!
//! Both binaries use the clap derive API. Options left unset on the command
//! line fall back to the configuration file and environment (see
//! [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory, hashing only the first page of each file
//! filedups
//!
//! # Scan two trees, hashing whole files
//! filedups -p 0 ~/Music /mnt/backup/Music
//!
//! # Walk the resulting groups interactively
//! procdups
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::output::{DUPLICATES_LIST, REWRITE_LIST};

/// Find duplicate regular files by size and content fingerprint.
///
/// Writes every duplicate as `fingerprint<TAB>inode<TAB>size<TAB>path` to the
/// list file, grouped by fingerprint.
#[derive(Debug, Parser)]
#[command(name = "filedups")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct FiledupsCli {
    /// Directories to scan (default: current directory)
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Print version information and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Maximum 4096-byte pages hashed per file (0 or less hashes whole files)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub pages: Option<i64>,

    /// Initial size of the path buffer (e.g. 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub arena_size: Option<u64>,

    /// Growth step of the path buffer (e.g. 128KiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub arena_increment: Option<u64>,

    /// List file to write
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Ignore the configuration file and skip first-run setup
    #[arg(long)]
    pub no_config: bool,

    /// Increase verbosity level (--verbose for debug, twice for trace)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not display progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl FiledupsCli {
    /// Directories to scan, defaulting to the current directory.
    #[must_use]
    pub fn scan_dirs(&self) -> Vec<PathBuf> {
        if self.dirs.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.dirs.clone()
        }
    }
}

/// Interactively resolve the groups of a duplicate list.
///
/// Each group is shown with its fingerprint and members; reply q (quit),
/// s (save the remaining groups and quit), n (next), l (hard-link to the
/// first member) or d (delete every member).
#[derive(Debug, Parser)]
#[command(name = "procdups")]
#[command(author, version, about, long_about = None)]
pub struct ProcdupsCli {
    /// List file to read
    #[arg(short, long, value_name = "PATH", default_value = DUPLICATES_LIST)]
    pub list: PathBuf,

    /// File the save action writes the remaining groups to
    #[arg(short, long, value_name = "PATH", default_value = REWRITE_LIST)]
    pub save_to: PathBuf,

    /// Group lines by the first N fingerprint characters instead of the
    /// whole fingerprint
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=32))]
    pub prefix_match: Option<u16>,

    /// Do not clear the screen between groups
    #[arg(long)]
    pub no_clear: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase verbosity level (--verbose for debug, twice for trace)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use filedups::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

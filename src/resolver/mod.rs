//! Interactive resolution of a duplicate list.
//!
//! # Overview
//!
//! The [`Resolver`] shows one group at a time and reads a one-letter reply:
//!
//! | Key | Action |
//! |-----|--------|
//! | `q` | quit, change nothing |
//! | `s` | save the groups not yet shown to the save file, then quit |
//! | `n` | next group |
//! | `l` | hard-link every member to the first one, then next group |
//! | `d` | delete every member, then next group |
//!
//! Replies are case-insensitive. Anything else re-prompts; end of input is
//! treated as quit. The list file itself is never modified.
//!
//! # Example
//!
//! ```no_run
//! use filedups::output::read_list;
//! use filedups::resolver::{split_groups, GroupingPolicy, Resolver, ResolverOptions};
//! use std::io;
//! use std::path::Path;
//!
//! let records = read_list(Path::new("duplicates.lst")).unwrap();
//! let groups = split_groups(&records, GroupingPolicy::Fingerprint);
//!
//! let stdin = io::stdin();
//! let mut resolver = Resolver::new(stdin.lock(), io::stdout(), ResolverOptions::default());
//! let summary = resolver.run(&groups).unwrap();
//! println!("{summary}");
//! ```

pub mod grouping;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use thiserror::Error;
use yansi::Paint;

use crate::actions::{delete_batch, link_batch};
use crate::output::{write_list_file, write_serialized, ListError, SerializedRecord, REWRITE_LIST};

pub use grouping::{split_groups, GroupingPolicy};

/// Operator reply to a displayed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Stop without changes
    Quit,
    /// Save the remaining groups and stop
    SaveAndQuit,
    /// Skip to the next group
    Next,
    /// Replace duplicates with hard links
    HardLink,
    /// Delete every member
    Delete,
}

impl Choice {
    /// Interpret a reply line. Only the first non-blank character counts.
    #[must_use]
    pub fn from_reply(reply: &str) -> Option<Self> {
        match reply.trim().chars().next()?.to_ascii_lowercase() {
            'q' => Some(Self::Quit),
            's' => Some(Self::SaveAndQuit),
            'n' => Some(Self::Next),
            'l' => Some(Self::HardLink),
            'd' => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Errors that end a resolver session.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Reading the reply or writing the display failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The remaining groups could not be saved.
    #[error(transparent)]
    Save(#[from] ListError),
}

/// Display and save settings.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Where the save action writes the remaining groups
    pub save_to: PathBuf,
    /// Clear the screen before each group
    pub clear_screen: bool,
    /// Highlight the group header
    pub color: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            save_to: PathBuf::from(REWRITE_LIST),
            clear_screen: false,
            color: false,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionEnd {
    /// Every group was shown
    #[default]
    Exhausted,
    /// The operator quit (or input ended)
    Quit,
    /// The remaining groups were written to `path`
    Saved {
        /// Save file
        path: PathBuf,
        /// Groups written
        groups: usize,
    },
}

/// Tally of a resolver session.
#[derive(Debug, Default)]
pub struct ResolveSummary {
    /// Groups displayed
    pub groups_shown: usize,
    /// Groups skipped with next
    pub skipped: usize,
    /// Files replaced by hard links
    pub linked: usize,
    /// Files deleted
    pub deleted: usize,
    /// Individual action failures
    pub failures: usize,
    /// Terminal state
    pub end: SessionEnd,
}

impl fmt::Display for ResolveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} group(s) shown: {} skipped, {} linked, {} deleted, {} failed",
            self.groups_shown, self.skipped, self.linked, self.deleted, self.failures
        )?;
        if let SessionEnd::Saved { path, groups } = &self.end {
            write!(f, "; {} group(s) saved to {}", groups, path.display())?;
        }
        Ok(())
    }
}

/// Group-by-group interactive loop over a reader and a writer.
pub struct Resolver<R, W> {
    input: R,
    output: W,
    options: ResolverOptions,
}

impl<R: BufRead, W: Write> Resolver<R, W> {
    /// Create a resolver reading replies from `input` and drawing on `output`.
    pub fn new(input: R, output: W, options: ResolverOptions) -> Self {
        Self {
            input,
            output,
            options,
        }
    }

    /// Consume the resolver, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the session over `groups`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if terminal I/O fails or the save file
    /// cannot be written. Failed deletions and links are logged and
    /// counted, not returned.
    pub fn run(&mut self, groups: &[Vec<SerializedRecord>]) -> Result<ResolveSummary, ResolveError> {
        let mut summary = ResolveSummary::default();

        for (index, group) in groups.iter().enumerate() {
            self.display(index, groups.len(), group)?;
            summary.groups_shown += 1;

            match self.prompt()? {
                Choice::Quit => {
                    summary.end = SessionEnd::Quit;
                    return Ok(summary);
                }
                Choice::SaveAndQuit => {
                    let remaining = &groups[index + 1..];
                    self.save(remaining)?;
                    summary.end = SessionEnd::Saved {
                        path: self.options.save_to.clone(),
                        groups: remaining.len(),
                    };
                    return Ok(summary);
                }
                Choice::Next => summary.skipped += 1,
                Choice::HardLink => {
                    let result = hard_link_group(group);
                    summary.linked += result.linked.len();
                    summary.failures += result.failures.len();
                    writeln!(self.output, "{}", result.summary())?;
                }
                Choice::Delete => {
                    let paths: Vec<PathBuf> = group.iter().map(|r| r.path.clone()).collect();
                    let result = delete_batch(&paths);
                    summary.deleted += result.success_count();
                    summary.failures += result.failure_count();
                    writeln!(self.output, "{}", result.summary())?;
                }
            }
        }

        Ok(summary)
    }

    fn display(&mut self, index: usize, total: usize, group: &[SerializedRecord]) -> io::Result<()> {
        if self.options.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        let fingerprint = group.first().map_or("", |r| r.fingerprint.as_str());
        let header = format!("[{}/{}] {}", index + 1, total, fingerprint);
        if self.options.color {
            writeln!(self.output, "{}", header.yellow().bold())?;
        } else {
            writeln!(self.output, "{header}")?;
        }

        for record in group {
            writeln!(
                self.output,
                "  {}\t{}\t{}",
                record.inode,
                record.size,
                record.path.display()
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<Choice> {
        let mut line = String::new();
        loop {
            write!(
                self.output,
                "[q]uit, [s]ave and quit, [n]ext, hard [l]ink, [d]elete: "
            )?;
            self.output.flush()?;

            String::clear(&mut line);
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Choice::Quit);
            }
            match Choice::from_reply(&line) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.output, "Unknown choice: {}", line.trim())?,
            }
        }
    }

    fn save(&self, groups: &[Vec<SerializedRecord>]) -> Result<(), ListError> {
        let path = &self.options.save_to;
        write_list_file(path, |w| {
            groups.iter().try_for_each(|group| write_serialized(w, group))
        })?;
        log::info!("Saved {} group(s) to {}", groups.len(), path.display());
        Ok(())
    }
}

fn hard_link_group(group: &[SerializedRecord]) -> crate::actions::BatchLinkResult {
    let Some((authority, others)) = group.split_first() else {
        return crate::actions::BatchLinkResult::default();
    };
    let others: Vec<(PathBuf, u64)> = others.iter().map(|r| (r.path.clone(), r.inode)).collect();
    link_batch(&authority.path, authority.inode, &others)
}

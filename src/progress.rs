//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner while directories are walked
//! and a bar while candidates are fingerprinted.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name reported while directories are walked.
pub const PHASE_WALK: &str = "walking";

/// Phase name reported while candidates are fingerprinted.
pub const PHASE_HASH: &str = "hashing";

/// Progress callback for the detection pipeline.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALK`] or [`PHASE_HASH`])
    /// * `total` - Total number of items to process, 0 if unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress reporter.
pub struct Progress {
    walking: RefCell<Option<ProgressBar>>,
    hashing: RefCell<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use filedups::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            walking: RefCell::new(None),
            hashing: RefCell::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALK => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.borrow_mut() = Some(pb);
            }
            PHASE_HASH => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(Self::hashing_style());
                pb.set_message("Fingerprinting");
                *self.hashing.borrow_mut() = Some(pb);
            }
            _ => {}
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        if let Some(ref pb) = *self.hashing.borrow() {
            pb.set_position(current as u64);
            pb.set_message(message);
        } else if let Some(ref pb) = *self.walking.borrow() {
            pb.set_position(current as u64);
            pb.set_message(message);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALK => {
                if let Some(pb) = self.walking.borrow_mut().take() {
                    pb.finish_and_clear();
                }
            }
            PHASE_HASH => {
                if let Some(pb) = self.hashing.borrow_mut().take() {
                    pb.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path_unchanged() {
        assert_eq!(truncate_path("/a/b.txt", 30), "/a/b.txt");
    }

    #[test]
    fn test_truncate_keeps_file_name() {
        let path = "/very/long/directory/structure/that/goes/on/file.txt";
        assert_eq!(truncate_path(path, 30), ".../file.txt");
    }

    #[test]
    fn test_truncate_long_file_name() {
        let name = "x".repeat(50);
        let truncated = truncate_path(&format!("/dir/{name}"), 30);
        assert_eq!(truncated.chars().count(), 30);
        assert!(truncated.starts_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_name() {
        let name = "é".repeat(40);
        let truncated = truncate_path(&format!("/d/{name}"), 30);
        assert_eq!(truncated.chars().count(), 30);
    }

    #[test]
    fn test_quiet_progress_is_noop() {
        let progress = Progress::new(true);
        progress.on_phase_start(PHASE_HASH, 10);
        progress.on_progress(1, "/a");
        progress.on_phase_end(PHASE_HASH);
        assert!(progress.hashing.borrow().is_none());
    }
}

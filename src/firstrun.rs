//! First-run bootstrap of the configuration file.
//!
//! The first time the detector runs without a configuration file it writes
//! a commented template and stops, so the operator can review the exclusion
//! rules before a full scan. The next invocation finds the file and scans.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError};

/// State of the configuration file after [`ensure_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// The file already existed; proceed with the scan.
    Ready(PathBuf),
    /// The template was just written; the caller should stop.
    Created(PathBuf),
}

/// Make sure the configuration file at `path` exists.
///
/// # Errors
///
/// Returns [`ConfigError`] if the template cannot be written.
pub fn ensure_config(path: &Path) -> Result<Bootstrap, ConfigError> {
    if path.exists() {
        return Ok(Bootstrap::Ready(path.to_path_buf()));
    }

    Config::write_template(path)?;
    log::info!("Created configuration template at {}", path.display());
    Ok(Bootstrap::Created(path.to_path_buf()))
}

/// [`ensure_config`] on the default location.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if no home directory is known.
pub fn ensure_default_config() -> Result<Bootstrap, ConfigError> {
    let path = Config::config_path().ok_or(ConfigError::NoConfigDir)?;
    ensure_config(&path)
}

/// Message shown after the template was created.
#[must_use]
pub fn first_run_message(path: &Path) -> String {
    format!(
        "Created configuration file {}\n\
         Edit it to add exclusion rules, then run filedups again.",
        path.display()
    )
}

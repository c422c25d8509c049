//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. The TOML file at [`Config::config_path`]
//!    (`$XDG_CONFIG_HOME/filedups/filedups.toml` on Linux)
//! 3. Environment variables prefixed `FILEDUPS_`, e.g. `FILEDUPS_PAGES=4`
//! 4. Command-line flags, applied with [`Config::merge_cli`]
//!
//! # Example
//!
//! ```toml
//! pages = 2
//! arena_size = 4194304
//! exclude = ["^\\.cache$", "^node_modules$"]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::FiledupsCli;
use crate::duplicates::FinderConfig;
use crate::output::DUPLICATES_LIST;
use crate::scanner::arena::{round_to_page, DEFAULT_ARENA_SIZE};
use crate::scanner::exclude::rule_from_patterns;
use crate::scanner::hasher::DEFAULT_MAX_PAGES;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "filedups.toml";

/// Upper bound applied to configured arena sizes (4 GiB).
const MAX_ARENA_BYTES: u64 = 1 << 32;

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "FILEDUPS_";

/// Errors raised while loading or bootstrapping configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer held a value of the wrong type or an unknown shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    /// An exclusion pattern is not a valid regular expression.
    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// No home directory could be determined.
    #[error("cannot determine the configuration directory (is HOME set?)")]
    NoConfigDir,

    /// The template could not be rendered.
    #[error("cannot render configuration template: {0}")]
    Template(#[from] toml::ser::Error),

    /// The configuration file could not be written.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Detector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum 4096-byte pages hashed per file; `<= 0` hashes whole files.
    pub pages: i64,
    /// Initial path buffer size in bytes.
    pub arena_size: u64,
    /// Path buffer growth step in bytes; a tenth of `arena_size` if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena_increment: Option<u64>,
    /// Regular expressions matched against directory-entry names.
    pub exclude: Vec<String>,
    /// List file written by the detector.
    pub list_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages: DEFAULT_MAX_PAGES,
            arena_size: DEFAULT_ARENA_SIZE as u64,
            arena_increment: None,
            exclude: Vec::new(),
            list_file: PathBuf::from(DUPLICATES_LIST),
        }
    }
}

impl Config {
    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "filedups").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Layer defaults, the file at `path` (if any) and the environment.
    ///
    /// A missing file contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a layer cannot be parsed.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn merge_cli(&mut self, cli: &FiledupsCli) {
        if let Some(pages) = cli.pages {
            self.pages = pages;
        }
        if let Some(size) = cli.arena_size {
            self.arena_size = size;
        }
        if let Some(increment) = cli.arena_increment {
            self.arena_increment = Some(increment);
        }
        if let Some(ref output) = cli.output {
            self.list_file.clone_from(output);
        }
    }

    /// Arena size rounded up to whole pages.
    #[must_use]
    pub fn arena_size_bytes(&self) -> usize {
        clamp_to_pages(self.arena_size)
    }

    /// Arena growth step rounded up to whole pages.
    #[must_use]
    pub fn arena_increment_bytes(&self) -> usize {
        let increment = self.arena_increment.unwrap_or(self.arena_size / 10);
        clamp_to_pages(increment)
    }

    /// Build the finder configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if an exclude pattern is invalid.
    pub fn finder_config(&self) -> Result<FinderConfig, ConfigError> {
        let rule = rule_from_patterns(&self.exclude)?;
        Ok(FinderConfig::default()
            .with_pages(self.pages)
            .with_arena_sizes(self.arena_size_bytes(), self.arena_increment_bytes())
            .with_exclude_rule(Arc::from(rule)))
    }

    /// Render the commented template written on first run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] if serialization fails.
    pub fn template() -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(&Config::default())?;
        Ok(format!(
            "# filedups configuration\n\
             #\n\
             # pages: 4096-byte pages hashed per file (0 or less hashes whole files)\n\
             # arena_size / arena_increment: path buffer sizing in bytes\n\
             # exclude: regular expressions; matching file and directory names are skipped\n\
             #   exclude = [\"^\\\\.cache$\", \"^node_modules$\"]\n\
             \n\
             {body}"
        ))
    }

    /// Write the template to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, Self::template()?).map_err(io_error)
    }
}

fn clamp_to_pages(bytes: u64) -> usize {
    let bytes = usize::try_from(bytes.min(MAX_ARENA_BYTES)).unwrap_or(DEFAULT_ARENA_SIZE);
    round_to_page(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for (key, _) in std::env::vars() {
            if key.starts_with(ENV_PREFIX) {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pages, 1);
        assert_eq!(config.arena_size_bytes(), 1024 * 1024);
        assert_eq!(config.arena_increment_bytes(), 106_496);
        assert!(config.exclude.is_empty());
        assert_eq!(config.list_file, PathBuf::from("duplicates.lst"));
    }

    #[test]
    fn test_load_from_toml() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "pages = 4\narena_size = 10000\nexclude = [\"^\\\\.git$\"]\n",
        )
        .unwrap();

        let config = Config::load_from_path(Some(&path)).unwrap();
        assert_eq!(config.pages, 4);
        assert_eq!(config.arena_size_bytes(), 12_288);
        assert_eq!(config.arena_increment_bytes(), 4096);
        assert_eq!(config.exclude, vec!["^\\.git$".to_string()]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "pages = \"many\"\n").unwrap();

        assert!(matches!(
            Config::load_from_path(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_hierarchy_file_env_cli() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "pages = 4\nlist_file = \"from-file.lst\"\n").unwrap();

        std::env::set_var("FILEDUPS_PAGES", "8");
        let mut config = Config::load_from_path(Some(&path)).unwrap();
        std::env::remove_var("FILEDUPS_PAGES");
        assert_eq!(config.pages, 8);
        assert_eq!(config.list_file, PathBuf::from("from-file.lst"));

        let cli = FiledupsCli::try_parse_from(["filedups", "-p", "0", "-o", "cli.lst"]).unwrap();
        config.merge_cli(&cli);
        assert_eq!(config.pages, 0);
        assert_eq!(config.list_file, PathBuf::from("cli.lst"));
    }

    #[test]
    fn test_finder_config_rejects_bad_pattern() {
        let config = Config {
            exclude: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.finder_config(),
            Err(ConfigError::Pattern(_))
        ));
    }

    #[test]
    fn test_template_parses_back_to_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        Config::write_template(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# filedups configuration"));
        assert_eq!(
            Config::load_from_path(Some(&path)).unwrap(),
            Config::default()
        );
    }
}

//! filedups - duplicate file finder and resolver
//!
//! Finds duplicate regular files under one or more directory trees by
//! narrowing candidates on size, inode and MD5 content fingerprint, writes
//! them as a tab-separated list, and lets an operator hard-link or delete
//! each group interactively.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod firstrun;
pub mod logging;
pub mod output;
pub mod progress;
pub mod resolver;
pub mod scanner;

use std::io::{self, IsTerminal};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::cli::{FiledupsCli, ProcdupsCli};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::firstrun::{ensure_default_config, first_run_message, Bootstrap};
use crate::output::{read_list, write_list_file, write_records};
use crate::progress::Progress;
use crate::resolver::{split_groups, GroupingPolicy, Resolver, ResolverOptions};

/// Run the detector.
///
/// # Errors
///
/// Returns an error for an invalid directory, an unreadable directory, bad
/// configuration or an unwritable list file.
pub fn run_app(cli: FiledupsCli) -> Result<ExitCode> {
    if cli.version {
        println!("filedups {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::Success);
    }

    logging::init_logging(cli.verbose, cli.quiet);

    let config_path = if cli.no_config {
        None
    } else {
        match ensure_default_config().context("failed to prepare configuration file")? {
            Bootstrap::Created(path) => {
                println!("{}", first_run_message(&path));
                return Ok(ExitCode::Success);
            }
            Bootstrap::Ready(path) => Some(path),
        }
    };

    let mut config =
        Config::load_from_path(config_path.as_deref()).context("failed to load configuration")?;
    config.merge_cli(&cli);

    let mut finder_config = config.finder_config()?;
    if !cli.quiet && !cli.no_progress {
        finder_config = finder_config.with_progress_callback(Rc::new(Progress::new(false)));
    }

    let outcome = DuplicateFinder::new(finder_config).find_duplicates_in_paths(&cli.scan_dirs())?;
    for root in &outcome.summary.roots {
        println!("{}", root.display());
    }

    let written = write_list_file(&config.list_file, |w| {
        write_records(w, &outcome.records, &outcome.arena)
    })
    .with_context(|| format!("failed to write {}", config.list_file.display()))?;

    let summary = &outcome.summary;
    log::info!(
        "{} files listed, {} vanished, {} hashed ({} unreadable)",
        summary.files_listed,
        summary.vanished,
        summary.files_hashed,
        summary.hash_failures
    );
    log::info!(
        "Wrote {} duplicate(s) in {} group(s) to {}, {} reclaimable",
        written,
        summary.duplicate_groups,
        config.list_file.display(),
        summary.reclaimable_display()
    );

    Ok(ExitCode::Success)
}

/// Run the interactive resolver.
///
/// # Errors
///
/// Returns an error if the list cannot be read or parsed, terminal I/O
/// fails, or the save file cannot be written.
pub fn run_resolver(cli: ProcdupsCli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let records =
        read_list(&cli.list).with_context(|| format!("failed to read {}", cli.list.display()))?;
    let policy = cli
        .prefix_match
        .map_or(GroupingPolicy::Fingerprint, |n| GroupingPolicy::Prefix(usize::from(n)));
    let groups = split_groups(&records, policy);

    if groups.is_empty() {
        println!("No duplicate groups in {}", cli.list.display());
        return Ok(ExitCode::Success);
    }

    let interactive = io::stdout().is_terminal();
    let options = ResolverOptions {
        save_to: cli.save_to.clone(),
        clear_screen: interactive && !cli.no_clear,
        color: interactive && !cli.no_color,
    };

    let summary = {
        let stdin = io::stdin();
        let mut resolver = Resolver::new(stdin.lock(), io::stdout().lock(), options);
        resolver.run(&groups)?
    };
    println!("{summary}");

    Ok(ExitCode::Success)
}

//! procdups - interactive duplicate resolver
//!
//! Reads the list written by `filedups` and applies per-group actions.

use clap::Parser;
use filedups::{cli::ProcdupsCli, error::ExitCode};

fn main() {
    let cli = match ProcdupsCli::try_parse() {
        Ok(cli) => cli,
        Err(err) => std::process::exit(ExitCode::from_usage_error(&err).as_i32()),
    };

    match filedups::run_resolver(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => std::process::exit(ExitCode::report(&err).as_i32()),
    }
}

//! filedups - duplicate file finder
//!
//! Entry point for the detector.

use clap::Parser;
use filedups::{cli::FiledupsCli, error::ExitCode};

fn main() {
    let cli = match FiledupsCli::try_parse() {
        Ok(cli) => cli,
        Err(err) => std::process::exit(ExitCode::from_usage_error(&err).as_i32()),
    };

    match filedups::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => std::process::exit(ExitCode::report(&err).as_i32()),
    }
}

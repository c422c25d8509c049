//! Process exit codes.

/// Exit codes shared by both binaries.
///
/// - 0: Success (completed normally, with or without duplicates)
/// - 1: Failure (invalid directory, unknown option, fatal I/O)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// Failure: the run stopped on an error.
    Failure = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FD000",
            Self::Failure => "FD001",
        }
    }

    /// Print a command-line parse error and pick the exit code for it.
    ///
    /// Help and version requests succeed; every usage error fails.
    #[must_use]
    pub fn from_usage_error(err: &clap::Error) -> Self {
        use clap::error::ErrorKind;

        if let Err(e) = err.print() {
            eprintln!("{e}");
        }
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Success,
            _ => Self::Failure,
        }
    }

    /// Report `err` on standard error and return the failure code.
    #[must_use]
    pub fn report(err: &anyhow::Error) -> Self {
        let code = Self::Failure;
        eprintln!("[{}] Error: {:#}", code.code_prefix(), err);
        code
    }
}

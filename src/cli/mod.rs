use clap::Parser;
use std::path::PathBuf;

use crate::error::DiffError;
use crate::logging;

/// Checks that every entry of the first zip archive exists in the second with the
/// same metadata and the same content. Entries only present in the second archive
/// are ignored. Stops at the first difference.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The reference archive. Every entry in it must be present in the candidate.
    pub reference: Option<PathBuf>,

    /// The candidate archive to check against the reference.
    pub candidate: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Both archive paths, or a usage error when either is missing.
    pub fn archive_paths(&self) -> Result<(PathBuf, PathBuf), DiffError> {
        match (&self.reference, &self.candidate) {
            (Some(reference), Some(candidate)) => Ok((reference.clone(), candidate.clone())),
            _ => Err(DiffError::Usage),
        }
    }

    pub fn log_directive(&self) -> &'static str {
        logging::default_directive(self.verbose, self.quiet)
    }
}

/// Parses command-line arguments using `clap`.
///
/// `--help`, `--version` and malformed options are handled by clap, which exits.
pub fn run() -> Args {
    Args::parse()
}

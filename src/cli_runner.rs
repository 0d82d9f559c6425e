//! Shared CLI entry point, kept out of `main.rs` so it can be driven from tests.

use tracing::debug;

use crate::cli;
use crate::differ;
use crate::error::DiffError;
use crate::logging;

/// Parses arguments, sets up logging and runs the diff.
pub fn run_cli_app() -> Result<(), DiffError> {
    let args = cli::run();
    logging::init(args.log_directive());

    let (reference, candidate) = args.archive_paths()?;
    debug!(reference = %reference.display(), candidate = %candidate.display(), "starting diff");
    differ::diff_paths(&reference, &candidate).map_err(|err| {
        debug!(entry = err.entry_name().unwrap_or("-"), "diff failed");
        err
    })?;
    Ok(())
}

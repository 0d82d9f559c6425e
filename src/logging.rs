//! Structured logging on stderr via `tracing`.
//!
//! `RUST_LOG` takes precedence over the level chosen on the command line.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Log filter for a given `-v` count, or `error` when quiet.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(default_directive: &str) {
    if TRACING_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
        .is_err()
    {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    // Another subscriber may already be set (e.g. by an embedding test harness).
    let _ = tracing_subscriber::registry().with(fmt_layer).with(filter).try_init();
}

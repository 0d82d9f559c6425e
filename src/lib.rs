//! # zipdiff
//!
//! Verifies that one zip archive is contained in another: every entry of the first
//! (reference) archive must exist in the second (candidate) archive under the same
//! name, with identical directory metadata and identical decompressed content.
//! The first difference found is reported and ends the run.
//!
//! ## Key Modules
//!
//! - [`archive`]: Opens zip archives and exposes entry metadata and content streams.
//! - [`compare`]: Field-by-field entry comparison and SHA-256 content digests.
//! - [`differ`]: Walks the reference archive and matches entries by name.
//! - [`error`]: The [`DiffError`] taxonomy.
//!
//! ## Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! match zipdiff::differ::diff_paths(Path::new("release.zip"), Path::new("rebuilt.zip")) {
//!     Ok(summary) => println!("{} entries verified", summary.entries_verified),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod cli_runner;
pub mod compare;
pub mod differ;
pub mod error;
pub mod logging;

pub use error::{DiffError, EntryMismatch, Side};

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::compare::MetadataField;

/// Which of the two archives an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first archive on the command line. Every entry in it must be matched.
    Reference,
    /// The second archive on the command line.
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => f.write_str("first"),
            Side::Candidate => f.write_str("second"),
        }
    }
}

/// Why a single pair of same-named entries failed to compare equal.
///
/// Produced by [`crate::compare::compare_entries`]; the differ attaches the entry
/// name and turns it into a [`DiffError`].
#[derive(Debug, Error)]
pub enum EntryMismatch {
    /// A metadata field differs. Only the first differing field is reported.
    #[error("different {0}")]
    Metadata(MetadataField),

    /// The decompressed stream could not be opened or read to the end.
    #[error("cannot be opened from the {side} archive: {source}")]
    ContentOpen {
        side: Side,
        #[source]
        source: io::Error,
    },

    /// Metadata matched but the SHA-256 digests of the content did not.
    #[error("different content {digest_a:?} != {digest_b:?}")]
    Content { digest_a: String, digest_b: String },
}

/// The primary error type for all operations in the `zipdiff` crate.
///
/// Every variant is fatal to the run: the first one produced is the one reported.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Fewer than two archive paths were given.
    #[error("not enough arguments")]
    Usage,

    /// An archive could not be opened or its central directory could not be read.
    #[error("cannot open archive '{}': {source}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry of the reference archive has no same-named entry in the candidate.
    #[error("file {name} not found in the second zip")]
    MissingEntry { name: String },

    /// A metadata field differs between the two entries called `name`.
    #[error("file {name} is different: different {field}")]
    MetadataMismatch { name: String, field: MetadataField },

    /// The content of `name` could not be decompressed on one side.
    #[error("file {name} cannot be opened from the {side} archive: {source}")]
    ContentOpen {
        name: String,
        side: Side,
        #[source]
        source: io::Error,
    },

    /// Metadata of `name` matched but its content did not.
    #[error("file {name} has different content {digest_a:?} != {digest_b:?}")]
    ContentMismatch {
        name: String,
        digest_a: String,
        digest_b: String,
    },
}

impl DiffError {
    /// Attaches the entry name to a per-entry mismatch.
    pub fn entry(name: impl Into<String>, mismatch: EntryMismatch) -> Self {
        let name = name.into();
        match mismatch {
            EntryMismatch::Metadata(field) => DiffError::MetadataMismatch { name, field },
            EntryMismatch::ContentOpen { side, source } => DiffError::ContentOpen { name, side, source },
            EntryMismatch::Content { digest_a, digest_b } => DiffError::ContentMismatch {
                name,
                digest_a,
                digest_b,
            },
        }
    }

    /// Name of the offending entry, if the error is about one.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            DiffError::MissingEntry { name }
            | DiffError::MetadataMismatch { name, .. }
            | DiffError::ContentOpen { name, .. }
            | DiffError::ContentMismatch { name, .. } => Some(name),
            DiffError::Usage | DiffError::ArchiveOpen { .. } => None,
        }
    }
}

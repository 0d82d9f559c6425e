//! # Archive Reader
//!
//! This module turns a zip file on disk into an ordered list of [`EntryDescriptor`]s
//! and hands out decompressed content streams on demand.
//!
//! The `zip` crate does the container work (central directory, zip64, decompression,
//! checksum verification). The handful of directory fields it keeps private are read
//! straight from each entry's central directory header.

mod header;
#[cfg(test)]
pub(crate) mod memory;
mod mtime;

pub use mtime::ModifiedTime;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::DiffError;
use header::FLAG_UTF8;

/// Metadata for a single member of an archive.
///
/// Every field is compared for exact equality; none is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// The entry name for messages, lossily decoded from `raw_name`.
    pub name: String,
    /// The entry name bytes exactly as stored. The join key between archives.
    pub raw_name: Vec<u8>,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub modified: ModifiedTime,
    /// Raw compression method code (0 = stored, 8 = deflate, 93 = zstd, ...).
    pub compression_method: u16,
    /// Raw comment bytes, undecoded.
    pub comment: Vec<u8>,
    /// Raw central directory extra field.
    pub extra_data: Vec<u8>,
    /// True when the name and comment are not known to be UTF-8.
    pub non_utf8: bool,
    /// "Version made by", including the host system in the high byte.
    pub creator_version: u16,
    /// "Version needed to extract".
    pub reader_version: u16,
    /// General purpose bit flags.
    pub flags: u16,
    /// CRC-32 as recorded in the directory.
    pub crc32: u32,
    pub external_attributes: u32,
}

/// A source of entries and their decompressed content.
pub trait EntrySource {
    /// Entries in the order they are stored in the archive directory.
    fn entries(&self) -> &[EntryDescriptor];

    /// Opens the decompressed stream of the entry at `index`.
    ///
    /// The stream is released when the returned reader is dropped.
    fn open_content(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>>;
}

/// An open zip archive.
///
/// The underlying file handles are closed when the handle is dropped.
pub struct ZipArchiveHandle {
    path: PathBuf,
    archive: ZipArchive<File>,
    entries: Vec<EntryDescriptor>,
}

impl ZipArchiveHandle {
    /// Opens the archive at `path` and reads the metadata of every entry.
    pub fn open(path: &Path) -> Result<Self, DiffError> {
        let open_error = |source: ZipError| DiffError::ArchiveOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| open_error(e.into()))?;
        // Second handle for the raw header reads; the archive owns the first.
        let mut raw = file.try_clone().map_err(|e| open_error(e.into()))?;
        let mut archive = ZipArchive::new(file).map_err(open_error)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(open_error)?;
            let fields = header::read_central_header(&mut raw, entry.central_header_start())
                .map_err(|e| open_error(e.into()))?;

            let raw_name = entry.name_raw().to_vec();
            let descriptor = EntryDescriptor {
                name: String::from_utf8_lossy(&raw_name).into_owned(),
                non_utf8: is_non_utf8(&raw_name, &fields.comment, fields.flags),
                raw_name,
                uncompressed_size: entry.size(),
                compressed_size: entry.compressed_size(),
                modified: ModifiedTime::resolve(entry.extra_data(), fields.dos_date, fields.dos_time),
                compression_method: fields.method,
                extra_data: entry.extra_data().to_vec(),
                creator_version: fields.version_made_by,
                reader_version: fields.version_needed,
                flags: fields.flags,
                crc32: entry.crc32(),
                external_attributes: fields.external_attributes,
                comment: fields.comment,
            };
            trace!(index, name = %descriptor.name, size = descriptor.uncompressed_size, "read entry");
            entries.push(descriptor);
        }

        debug!(path = %path.display(), entries = entries.len(), "opened archive");
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntrySource for ZipArchiveHandle {
    fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    fn open_content(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let entry = self
            .archive
            .by_index(index)
            .map_err(|e| match e {
                ZipError::Io(err) => err,
                other => io::Error::new(io::ErrorKind::Other, other),
            })?;
        Ok(Box::new(entry))
    }
}

/// Scans `raw` for UTF-8 use. Returns `(valid, required)`: whether the bytes are
/// valid UTF-8, and whether they contain a character that CP-437 and the common
/// local code pages disagree on (controls, anything above `}`, and `\`).
fn detect_utf8(raw: &[u8]) -> (bool, bool) {
    match std::str::from_utf8(raw) {
        Ok(text) => (
            true,
            text.chars().any(|c| c < '\u{20}' || c > '}' || c == '\\'),
        ),
        Err(_) => (false, false),
    }
}

/// Derives the name encoding the way Go's `archive/zip` reader does: invalid
/// UTF-8 in the name or comment means non-UTF-8, text that reads the same in
/// every code page never is, and anything else follows the language encoding
/// flag (general purpose bit 11).
fn is_non_utf8(raw_name: &[u8], raw_comment: &[u8], flags: u16) -> bool {
    let (name_valid, name_required) = detect_utf8(raw_name);
    let (comment_valid, comment_required) = detect_utf8(raw_comment);
    if !name_valid || !comment_valid {
        true
    } else if !name_required && !comment_required {
        false
    } else {
        flags & FLAG_UTF8 == 0
    }
}

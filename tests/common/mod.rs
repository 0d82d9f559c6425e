#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// One member of a fixture archive.
#[derive(Clone, Copy)]
pub struct Member<'a> {
    pub name: &'a str,
    pub content: &'a [u8],
    pub method: CompressionMethod,
    pub modified: (u16, u8, u8, u8, u8, u8),
    pub mode: u32,
}

impl<'a> Member<'a> {
    pub fn stored(name: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            content,
            method: CompressionMethod::Stored,
            modified: (2023, 5, 17, 10, 30, 0),
            mode: 0o644,
        }
    }

    pub fn deflated(name: &'a str, content: &'a [u8]) -> Self {
        Self {
            method: CompressionMethod::Deflated,
            ..Self::stored(name, content)
        }
    }
}

/// Writes a zip archive with the given members to `dir/file_name`.
pub fn write_zip(dir: &Path, file_name: &str, members: &[Member<'_>]) -> PathBuf {
    let path = dir.join(file_name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for m in members {
        let (y, mo, d, h, mi, s) = m.modified;
        let options = FileOptions::default()
            .compression_method(m.method)
            .last_modified_time(DateTime::from_date_and_time(y, mo, d, h, mi, s).unwrap())
            .unix_permissions(m.mode);
        zip.start_file(m.name, options).unwrap();
        zip.write_all(m.content).unwrap();
    }
    zip.finish().unwrap();
    path
}

/// Overwrites the first occurrence of `from` in the file with `to` (same length).
pub fn patch_bytes(path: &Path, from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let mut bytes = std::fs::read(path).unwrap();
    let at = bytes
        .windows(from.len())
        .position(|w| w == from)
        .expect("pattern present in archive");
    bytes[at..at + to.len()].copy_from_slice(to);
    std::fs::write(path, bytes).unwrap();
}

/// Overwrites every occurrence of `from` in the file with `to` (same length).
pub fn patch_all_bytes(path: &Path, from: &[u8], to: &[u8]) -> usize {
    assert_eq!(from.len(), to.len());
    let mut bytes = std::fs::read(path).unwrap();
    let mut patched = 0;
    let mut at = 0;
    while let Some(found) = bytes[at..].windows(from.len()).position(|w| w == from) {
        let start = at + found;
        bytes[start..start + to.len()].copy_from_slice(to);
        at = start + to.len();
        patched += 1;
    }
    std::fs::write(path, bytes).unwrap();
    patched
}

/// Clears general purpose bit 11 (UTF-8 names) in every local and central
/// directory header of the file.
pub fn clear_utf8_flag(path: &Path) {
    const LOCAL: &[u8] = b"PK\x03\x04";
    const CENTRAL: &[u8] = b"PK\x01\x02";
    let mut bytes = std::fs::read(path).unwrap();
    for at in 0..bytes.len().saturating_sub(4) {
        // High byte of the flags field: offset 7 after a local signature, 9 after a central one.
        let flags_high = match &bytes[at..at + 4] {
            sig if sig == LOCAL => at + 7,
            sig if sig == CENTRAL => at + 9,
            _ => continue,
        };
        bytes[flags_high] &= !0x08;
    }
    std::fs::write(path, bytes).unwrap();
}

//! # Entry Comparison
//!
//! Decides whether two same-named entries are identical. Metadata fields are
//! checked in a fixed order and the first difference is reported; content is only
//! hashed once every metadata field agrees.

pub mod digest;

use std::fmt;

use tracing::trace;

use crate::archive::{EntryDescriptor, EntrySource};
use crate::error::{EntryMismatch, Side};

/// A metadata field of an [`EntryDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    UncompressedSize,
    ModifiedTime,
    CompressionMethod,
    Comment,
    ExtraData,
    NonUtf8Flag,
    CreatorVersion,
    ReaderVersion,
    Flags,
    Crc32,
    CompressedSize,
    ExternalAttributes,
}

impl MetadataField {
    /// All fields, in the order they are checked.
    pub const ALL: [MetadataField; 12] = [
        MetadataField::UncompressedSize,
        MetadataField::ModifiedTime,
        MetadataField::CompressionMethod,
        MetadataField::Comment,
        MetadataField::ExtraData,
        MetadataField::NonUtf8Flag,
        MetadataField::CreatorVersion,
        MetadataField::ReaderVersion,
        MetadataField::Flags,
        MetadataField::Crc32,
        MetadataField::CompressedSize,
        MetadataField::ExternalAttributes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetadataField::UncompressedSize => "size",
            MetadataField::ModifiedTime => "modified time",
            MetadataField::CompressionMethod => "compression method",
            MetadataField::Comment => "comment",
            MetadataField::ExtraData => "extra data",
            MetadataField::NonUtf8Flag => "NonUTF8 flag",
            MetadataField::CreatorVersion => "creator version",
            MetadataField::ReaderVersion => "reader version",
            MetadataField::Flags => "flags",
            MetadataField::Crc32 => "CRC32",
            MetadataField::CompressedSize => "compressed size",
            MetadataField::ExternalAttributes => "external attributes",
        }
    }

    /// Whether `a` and `b` agree on this field.
    pub fn matches(self, a: &EntryDescriptor, b: &EntryDescriptor) -> bool {
        match self {
            MetadataField::UncompressedSize => a.uncompressed_size == b.uncompressed_size,
            MetadataField::ModifiedTime => a.modified == b.modified,
            MetadataField::CompressionMethod => a.compression_method == b.compression_method,
            MetadataField::Comment => a.comment == b.comment,
            MetadataField::ExtraData => a.extra_data == b.extra_data,
            MetadataField::NonUtf8Flag => a.non_utf8 == b.non_utf8,
            MetadataField::CreatorVersion => a.creator_version == b.creator_version,
            MetadataField::ReaderVersion => a.reader_version == b.reader_version,
            MetadataField::Flags => a.flags == b.flags,
            MetadataField::Crc32 => a.crc32 == b.crc32,
            MetadataField::CompressedSize => a.compressed_size == b.compressed_size,
            MetadataField::ExternalAttributes => a.external_attributes == b.external_attributes,
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First field, in check order, on which `a` and `b` disagree.
pub fn first_differing_field(a: &EntryDescriptor, b: &EntryDescriptor) -> Option<MetadataField> {
    MetadataField::ALL.into_iter().find(|field| !field.matches(a, b))
}

/// Compares entry `reference_index` of `reference` with entry `candidate_index`
/// of `candidate`.
///
/// Content streams are opened only when all metadata matches.
pub fn compare_entries<A, B>(
    reference: &mut A,
    reference_index: usize,
    candidate: &mut B,
    candidate_index: usize,
) -> Result<(), EntryMismatch>
where
    A: EntrySource + ?Sized,
    B: EntrySource + ?Sized,
{
    let a = &reference.entries()[reference_index];
    let b = &candidate.entries()[candidate_index];
    if let Some(field) = first_differing_field(a, b) {
        trace!(name = %a.name, %field, "metadata differs");
        return Err(EntryMismatch::Metadata(field));
    }

    let digest_a = digest::entry_digest(reference, reference_index).map_err(|source| {
        EntryMismatch::ContentOpen {
            side: Side::Reference,
            source,
        }
    })?;
    let digest_b = digest::entry_digest(candidate, candidate_index).map_err(|source| {
        EntryMismatch::ContentOpen {
            side: Side::Candidate,
            source,
        }
    })?;

    if digest_a != digest_b {
        return Err(EntryMismatch::Content { digest_a, digest_b });
    }
    Ok(())
}

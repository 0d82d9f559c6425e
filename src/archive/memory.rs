//! In-memory [`EntrySource`] for unit tests. Records every content open so tests
//! can assert that streams were (or were not) touched.

use std::io::{self, Read};

use chrono::DateTime;

use super::{EntryDescriptor, EntrySource, ModifiedTime};

pub(crate) struct MemoryArchive {
    entries: Vec<EntryDescriptor>,
    contents: Vec<Option<Vec<u8>>>,
    pub opened: Vec<usize>,
}

/// A descriptor with realistic defaults for a stored entry holding `content`.
pub(crate) fn descriptor(name: &str, content: &[u8]) -> EntryDescriptor {
    EntryDescriptor {
        name: name.to_owned(),
        raw_name: name.as_bytes().to_vec(),
        uncompressed_size: content.len() as u64,
        compressed_size: content.len() as u64,
        modified: ModifiedTime(DateTime::from_timestamp(1_684_319_400, 0).unwrap()),
        compression_method: 0,
        comment: Vec::new(),
        extra_data: Vec::new(),
        non_utf8: false,
        creator_version: 0x032e,
        reader_version: 10,
        flags: 0,
        crc32: crc32fast::hash(content),
        external_attributes: 0o100644 << 16,
    }
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            contents: Vec::new(),
            opened: Vec::new(),
        }
    }

    pub fn with_entry(self, name: &str, content: &[u8]) -> Self {
        self.with_descriptor(descriptor(name, content), Some(content.to_vec()))
    }

    /// Adds an entry with explicit metadata. `None` content makes every open fail.
    pub fn with_descriptor(mut self, descriptor: EntryDescriptor, content: Option<Vec<u8>>) -> Self {
        self.entries.push(descriptor);
        self.contents.push(content);
        self
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut EntryDescriptor {
        &mut self.entries[index]
    }
}

impl EntrySource for MemoryArchive {
    fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    fn open_content(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        self.opened.push(index);
        match &self.contents[index] {
            Some(bytes) => Ok(Box::new(bytes.as_slice())),
            None => Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream")),
        }
    }
}

//! SHA-256 content digests.

use std::io::{self, Read};

use sha2::{Digest, Sha256};

use crate::archive::EntrySource;

/// Hashes everything `reader` yields and returns the digest as lowercase hex.
pub fn sha256_hex<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest of the decompressed content of entry `index`. The stream is closed
/// before returning, on success and on error.
pub fn entry_digest<S: EntrySource + ?Sized>(source: &mut S, index: usize) -> io::Result<String> {
    let mut stream = source.open_content(index)?;
    sha256_hex(&mut stream)
}

//! Raw fields of a central directory file header that the `zip` crate reads but
//! does not expose.
//!
//! Layout (all little-endian), from APPNOTE 4.3.12:
//!
//! | offset | size | field                    |
//! |--------|------|--------------------------|
//! | 0      | 4    | signature `PK\x01\x02`   |
//! | 4      | 2    | version made by          |
//! | 6      | 2    | version needed           |
//! | 8      | 2    | general purpose flags    |
//! | 10     | 2    | compression method       |
//! | 12     | 2    | last mod time (MS-DOS)   |
//! | 14     | 2    | last mod date (MS-DOS)   |
//! | 28     | 2    | file name length (n)     |
//! | 30     | 2    | extra field length (m)   |
//! | 32     | 2    | file comment length (k)  |
//! | 38     | 4    | external file attributes |
//! | 46     | n    | file name                |
//! | 46+n   | m    | extra field              |
//! | 46+n+m | k    | file comment             |

use std::io::{self, Read, Seek, SeekFrom};

const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const CENTRAL_HEADER_LEN: usize = 46;

/// General purpose bit 11: name and comment are UTF-8.
pub(crate) const FLAG_UTF8: u16 = 0x0800;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CentralHeaderFields {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub dos_time: u16,
    pub dos_date: u16,
    pub external_attributes: u32,
    name_len: u16,
    extra_len: u16,
    comment_len: u16,
    /// Raw comment bytes, undecoded.
    pub comment: Vec<u8>,
}

#[inline]
fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

#[inline]
fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

impl CentralHeaderFields {
    fn parse(buf: &[u8; CENTRAL_HEADER_LEN]) -> io::Result<Self> {
        let signature = le_u32(buf, 0);
        if signature != CENTRAL_HEADER_SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bad central directory signature {signature:#010x}"),
            ));
        }
        Ok(Self {
            version_made_by: le_u16(buf, 4),
            version_needed: le_u16(buf, 6),
            flags: le_u16(buf, 8),
            method: le_u16(buf, 10),
            dos_time: le_u16(buf, 12),
            dos_date: le_u16(buf, 14),
            external_attributes: le_u32(buf, 38),
            name_len: le_u16(buf, 28),
            extra_len: le_u16(buf, 30),
            comment_len: le_u16(buf, 32),
            comment: Vec::new(),
        })
    }
}

/// Reads the central directory header starting at `offset`: the fixed part and
/// the raw comment that follows the name and extra field.
pub(crate) fn read_central_header<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
) -> io::Result<CentralHeaderFields> {
    let mut buf = [0u8; CENTRAL_HEADER_LEN];
    reader.seek(SeekFrom::Start(offset))?;
    reader.read_exact(&mut buf)?;
    let mut fields = CentralHeaderFields::parse(&buf)?;

    if fields.comment_len > 0 {
        let skip = i64::from(fields.name_len) + i64::from(fields.extra_len);
        reader.seek(SeekFrom::Current(skip))?;
        let mut comment = vec![0u8; usize::from(fields.comment_len)];
        reader.read_exact(&mut comment)?;
        fields.comment = comment;
    }
    Ok(fields)
}

//! Entry modification time.
//!
//! Zip stores a 2-second MS-DOS timestamp in the directory record and, optionally,
//! more precise timestamps in the extra field. Any recognised extra-field
//! timestamp replaces the MS-DOS one; among those the last recognised block wins.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

const EXTRA_NTFS: u16 = 0x000a;
const EXTRA_PKWARE_UNIX: u16 = 0x000d;
const EXTRA_EXT_TIMESTAMP: u16 = 0x5455;
const EXTRA_INFOZIP_UNIX: u16 = 0x5855;

/// NTFS attribute 1: mtime, atime, ctime.
const NTFS_TIMES_TAG: u16 = 1;
const NTFS_TIMES_LEN: usize = 24;
/// 100ns ticks per second in NTFS timestamps.
const NTFS_TICKS_PER_SECOND: u64 = 10_000_000;
/// Seconds between 1601-01-01 and 1970-01-01.
const NTFS_EPOCH_OFFSET: i64 = 11_644_473_600;

/// Modification time of an entry as a UTC instant, compared for exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedTime(pub DateTime<Utc>);

impl ModifiedTime {
    /// Resolves the modification time from the MS-DOS fields and the extra field.
    pub fn resolve(extra: &[u8], dos_date: u16, dos_time: u16) -> Self {
        ModifiedTime(from_extra_field(extra).unwrap_or_else(|| from_dos(dos_date, dos_time)))
    }
}

impl fmt::Display for ModifiedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Decodes MS-DOS date/time fields. Out-of-range components carry over into the
/// next larger unit (month 0 is December of the year before, 60 seconds is the
/// next minute), so every field pair names exactly one instant.
fn from_dos(date: u16, time: u16) -> DateTime<Utc> {
    let months = (i64::from((date >> 9) & 0x7f) + 1980) * 12 + i64::from((date >> 5) & 0x0f) - 1;
    let day = i64::from(date & 0x1f);
    let hour = i64::from(time >> 11);
    let minute = i64::from((time >> 5) & 0x3f);
    let second = i64::from(time & 0x1f) * 2;

    let year = i32::try_from(months.div_euclid(12)).ok();
    let month = u32::try_from(months.rem_euclid(12) + 1).ok();
    let offset = Duration::seconds((day - 1) * 86_400 + hour * 3_600 + minute * 60 + second);
    year.zip(month)
        .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|start| start.checked_add_signed(offset))
        .map(|naive| Utc.from_utc_datetime(&naive))
        // Unreachable for 16-bit inputs: years stay within 1979..=2107.
        .unwrap_or_default()
}

fn from_extra_field(mut extra: &[u8]) -> Option<DateTime<Utc>> {
    let mut found = None;
    while extra.len() >= 4 {
        let tag = u16::from_le_bytes([extra[0], extra[1]]);
        let size = usize::from(u16::from_le_bytes([extra[2], extra[3]]));
        extra = &extra[4..];
        if size > extra.len() {
            break;
        }
        let (block, rest) = extra.split_at(size);
        extra = rest;

        let parsed = match tag {
            EXTRA_NTFS => ntfs_mtime(block),
            EXTRA_PKWARE_UNIX | EXTRA_INFOZIP_UNIX => unix_mtime(block),
            EXTRA_EXT_TIMESTAMP => ext_timestamp_mtime(block),
            _ => None,
        };
        if parsed.is_some() {
            found = parsed;
        }
    }
    found
}

fn read_u32(block: &[u8], at: usize) -> Option<u32> {
    let bytes = block.get(at..at + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Tag 0x5455: one flag byte, then mtime when bit 0 is set.
fn ext_timestamp_mtime(block: &[u8]) -> Option<DateTime<Utc>> {
    let flags = *block.first()?;
    if flags & 0x01 == 0 {
        return None;
    }
    let secs = read_u32(block, 1)?;
    DateTime::from_timestamp(i64::from(secs), 0)
}

/// Tags 0x000d and 0x5855: atime then mtime, 32 bits each.
fn unix_mtime(block: &[u8]) -> Option<DateTime<Utc>> {
    let secs = read_u32(block, 4)?;
    DateTime::from_timestamp(i64::from(secs), 0)
}

/// Tag 0x000a: 4 reserved bytes, then attribute blocks. Only a full-size
/// attribute 1 is used; its first field is mtime in ticks since 1601.
fn ntfs_mtime(block: &[u8]) -> Option<DateTime<Utc>> {
    let mut attrs = block.get(4..)?;
    let mut found = None;
    while attrs.len() >= 4 {
        let tag = u16::from_le_bytes([attrs[0], attrs[1]]);
        let size = usize::from(u16::from_le_bytes([attrs[2], attrs[3]]));
        attrs = &attrs[4..];
        if size > attrs.len() {
            break;
        }
        let (attr, rest) = attrs.split_at(size);
        attrs = rest;
        if tag != NTFS_TIMES_TAG || size != NTFS_TIMES_LEN {
            continue;
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&attr[..8]);
        let ticks = u64::from_le_bytes(raw);
        let secs = i64::try_from(ticks / NTFS_TICKS_PER_SECOND).ok()? - NTFS_EPOCH_OFFSET;
        let nanos = u32::try_from((ticks % NTFS_TICKS_PER_SECOND) * 100).ok()?;
        found = DateTime::from_timestamp(secs, nanos);
    }
    found
}

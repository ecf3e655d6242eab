//! CRC32 checksums for snapshot bodies
//!
//! Uses CRC32 (IEEE polynomial) via crc32fast. Checksums are rendered as
//! `crc32:xxxxxxxx` inside the snapshot header.

use crc32fast::Hasher;

const PREFIX: &str = "crc32:";

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a checksum as `crc32:xxxxxxxx`.
pub fn format_checksum(checksum: u32) -> String {
    format!("{}{:08x}", PREFIX, checksum)
}

/// Parses a `crc32:xxxxxxxx` string. Returns `None` for any other shape.
pub fn parse_checksum(s: &str) -> Option<u32> {
    let hex = s.strip_prefix(PREFIX)?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

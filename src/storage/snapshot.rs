//! Snapshot file for the in-memory store
//!
//! Layout: one header line, a newline, then the body.
//!
//! ```text
//! {"format_version":1,"created_at":"2026-10-19T10:00:00Z","checksum":"crc32:deadbeef"}
//! {"campgrounds":[...],"reviews":[...]}
//! ```
//!
//! The checksum covers the body bytes exactly as written. Writes go to a
//! sibling `.tmp` file which is fsynced and then renamed over the target.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, format_checksum, parse_checksum};
use super::document::Document;
use super::errors::{StorageError, StorageResult};

const FORMAT_VERSION: u8 = 1;

/// Collection name -> documents in insertion order
pub type Collections = BTreeMap<String, Vec<Document>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct SnapshotHeader {
    format_version: u8,
    created_at: String,
    checksum: String,
}

/// Write `collections` to `path`, replacing any existing snapshot.
pub fn write_snapshot(path: &Path, collections: &Collections) -> StorageResult<()> {
    let body = serde_json::to_vec(collections)
        .map_err(|e| StorageError::Internal(format!("snapshot encode failed: {}", e)))?;

    let header = SnapshotHeader {
        format_version: FORMAT_VERSION,
        created_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        checksum: format_checksum(compute_checksum(&body)),
    };
    let header = serde_json::to_vec(&header)
        .map_err(|e| StorageError::Internal(format!("snapshot encode failed: {}", e)))?;

    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp).map_err(|e| StorageError::io_at_path(&tmp, e))?;
        file.write_all(&header)
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.write_all(&body))
            .and_then(|_| file.sync_all())
            .map_err(|e| StorageError::io_at_path(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| StorageError::io_at_path(path, e))?;
    Ok(())
}

/// Read a snapshot back. A missing file is an empty store.
///
/// # Errors
///
/// `Corrupted` when the header is malformed, the format version is unknown,
/// or the body does not match its checksum.
pub fn read_snapshot(path: &Path) -> StorageResult<Collections> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Collections::new()),
        Err(e) => return Err(StorageError::io_at_path(path, e)),
    };

    let split = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| StorageError::Corrupted("missing snapshot header".to_string()))?;
    let (header, body) = (&bytes[..split], &bytes[split + 1..]);

    let header: SnapshotHeader = serde_json::from_slice(header)
        .map_err(|e| StorageError::Corrupted(format!("bad snapshot header: {}", e)))?;

    if header.format_version != FORMAT_VERSION {
        return Err(StorageError::Corrupted(format!(
            "unsupported snapshot format version {}",
            header.format_version
        )));
    }

    let expected = parse_checksum(&header.checksum).ok_or_else(|| {
        StorageError::Corrupted(format!("bad checksum field '{}'", header.checksum))
    })?;
    let actual = compute_checksum(body);
    if expected != actual {
        return Err(StorageError::Corrupted(format!(
            "checksum mismatch: header {} body {}",
            format_checksum(expected),
            format_checksum(actual)
        )));
    }

    serde_json::from_slice(body)
        .map_err(|e| StorageError::Corrupted(format!("bad snapshot body: {}", e)))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

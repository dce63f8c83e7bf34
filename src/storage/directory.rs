//! Segment Directory
//!
//! The data directory and its `sstable-<millis>.json` file naming.
//!
//! ## Responsibilities
//! - Create the data directory on first use
//! - Name new segment files after a millisecond timestamp
//! - List existing segment files oldest → newest for bootstrap

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KvError, Result};

const SEGMENT_PREFIX: &str = "sstable-";
const SEGMENT_EXTENSION: &str = ".json";

/// Data directory holding one file per flushed segment
#[derive(Debug, Clone)]
pub struct SegmentDirectory {
    dir: PathBuf,
}

impl SegmentDirectory {
    /// Open the directory, creating it (and missing parents) if absent
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        if !dir.is_dir() {
            return Err(KvError::Storage(format!(
                "Data directory {} is not a directory",
                dir.display()
            )));
        }

        Ok(Self { dir })
    }

    /// Directory path
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of the segment file for `timestamp_ms`
    pub fn segment_path(&self, timestamp_ms: u64) -> PathBuf {
        self.dir.join(segment_file_name(timestamp_ms))
    }

    /// Segment files sorted ascending by file name.
    ///
    /// Timestamps in the names make this oldest → newest as long as every
    /// name has the same number of digits. Names are compared as strings, so
    /// `sstable-200.json` sorts after `sstable-1700000000000.json`. Entries
    /// that are not regular files or do not follow the naming scheme are
    /// skipped.
    pub fn list_segments(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<(String, PathBuf)> = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if !entry.file_type()?.is_file() || parse_segment_timestamp(&path).is_none() {
                tracing::warn!(
                    path = %path.display(),
                    "Skipping non-segment entry in data directory"
                );
                continue;
            }

            files.push((name, path));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}

/// "sstable-1700000000000.json" for 1700000000000
pub fn segment_file_name(timestamp_ms: u64) -> String {
    format!("{}{}{}", SEGMENT_PREFIX, timestamp_ms, SEGMENT_EXTENSION)
}

/// Parse the timestamp out of a segment file name.
/// "sstable-1700000000000.json" → Some(1700000000000)
pub fn parse_segment_timestamp(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let digits = name
        .strip_prefix(SEGMENT_PREFIX)?
        .strip_suffix(SEGMENT_EXTENSION)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

//! SSTable Module
//!
//! Sorted String Table - immutable sorted segment persisted as one file.
//!
//! ## File Format
//! ```text
//! sstable-<unix millis>.json
//!
//! [
//!   ["apple",  {"data": "red",   "isDeleted": false}],
//!   ["banana", {"data": "",      "isDeleted": true }],
//!   ...                          (ascending by key)
//! ]
//! ```
//!
//! The whole file is loaded into memory; a `HashMap` index maps each key to
//! its position in the entry list. Files written here are sorted by byte
//! order, but lookups never depend on it, so files sorted under another
//! collation load as well.

mod reader;
mod writer;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{KvError, Result};
use crate::memtable::EntryMeta;

use super::Segment;

/// Immutable sorted segment with an in-memory point-lookup index
#[derive(Debug)]
pub struct SSTable {
    /// Backing file
    path: PathBuf,
    /// (key, metadata) pairs, one per key
    entries: Vec<(String, EntryMeta)>,
    /// key → position in `entries`
    index: HashMap<String, usize>,
}

impl SSTable {
    /// Build an SSTable from a snapshot already sorted by key.
    ///
    /// Nothing is written; call [`SSTable::write_to_disk`] to persist it.
    pub fn new(path: impl Into<PathBuf>, entries: Vec<(String, EntryMeta)>) -> Self {
        debug_assert!(
            entries.windows(2).all(|pair| pair[0].0 < pair[1].0),
            "SSTable entries must be strictly ascending"
        );

        let index = build_index(&entries);
        Self {
            path: path.into(),
            entries,
            index,
        }
    }

    /// Entry for `key`, tombstones included - O(1) via the index
    pub fn get(&self, key: &str) -> Option<&EntryMeta> {
        let entry = self
            .index
            .get(key)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, entry)| entry);

        tracing::trace!(
            key,
            found = entry.is_some(),
            path = %self.path.display(),
            "sstable lookup"
        );
        entry
    }

    /// SSTables never accept writes
    pub fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(KvError::ReadOnly(self.path.clone()))
    }

    /// Number of entries, tombstones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sorted entries
    pub fn entries(&self) -> &[(String, EntryMeta)] {
        &self.entries
    }

    /// Replace the entries and rebuild the index in one step
    fn replace_entries(&mut self, entries: Vec<(String, EntryMeta)>) {
        self.index = build_index(&entries);
        self.entries = entries;
    }
}

impl Segment for SSTable {
    fn lookup(&self, key: &str) -> Option<&EntryMeta> {
        self.get(key)
    }

    fn set(&mut self, key: String, value: String) -> Result<()> {
        SSTable::set(self, &key, &value)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn build_index(entries: &[(String, EntryMeta)]) -> HashMap<String, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(position, (key, _))| (key.clone(), position))
        .collect()
}

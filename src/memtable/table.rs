//! MemTable implementation
//!
//! HashMap-based memtable; the engine serializes access to it.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::storage::{SSTable, Segment};

use super::EntryMeta;

/// In-memory table for recent writes
#[derive(Debug, Default)]
pub struct MemTable {
    data: HashMap<String, EntryMeta>,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`.
    ///
    /// A key tombstoned in this generation stays deleted: the write is
    /// dropped and `false` is returned. The tombstone only goes away once
    /// the table is flushed.
    pub fn set(&mut self, key: String, value: String) -> bool {
        if matches!(self.data.get(&key), Some(entry) if entry.is_deleted) {
            return false;
        }

        self.data.insert(key, EntryMeta::live(value));
        true
    }

    /// Mark `key` deleted, inserting an empty tombstone if it was never set
    pub fn delete(&mut self, key: String) {
        self.data
            .entry(key)
            .and_modify(|entry| entry.is_deleted = true)
            .or_insert_with(EntryMeta::tombstone);
    }

    /// Live entry for `key`; tombstones read as not found
    pub fn get(&self, key: &str) -> Option<&EntryMeta> {
        self.data.get(key).filter(|entry| !entry.is_deleted)
    }

    /// Number of slots, tombstones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert the buffered entries into an SSTable at `path`.
    ///
    /// Returns `Ok(None)` when there is nothing to flush. On success the
    /// table is written to disk before the memtable is cleared; if the write
    /// fails the memtable keeps its entries.
    pub fn flush_to_sstable(&mut self, path: &Path) -> Result<Option<SSTable>> {
        if self.data.is_empty() {
            return Ok(None);
        }

        let mut entries: Vec<(String, EntryMeta)> = self
            .data
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let sstable = SSTable::new(path, entries);
        sstable.write_to_disk()?;

        self.data.clear();
        Ok(Some(sstable))
    }
}

impl Segment for MemTable {
    fn lookup(&self, key: &str) -> Option<&EntryMeta> {
        self.data.get(key)
    }

    fn set(&mut self, key: String, value: String) -> Result<()> {
        MemTable::set(self, key, value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

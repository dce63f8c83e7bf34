//! Segment Chain
//!
//! Ordered list of segments that defines read resolution order.
//!
//! ```text
//! index:   0           1              2                 n
//!        ┌──────────┬──────────────┬──────────────┬───┬──────────────┐
//!        │ MemTable │ SSTable (new)│ SSTable      │...│ SSTable (old)│
//!        └──────────┴──────────────┴──────────────┴───┴──────────────┘
//!        reads scan left → right, first present entry wins
//! ```

use std::path::Path;

use crate::memtable::{EntryMeta, MemTable};

use super::{SSTable, Segment, SegmentHandle};

/// Memtable followed by SSTables, newest first
///
/// Index 0 is always the memtable; the only way to add an SSTable is
/// [`SegmentChain::insert_after_head`], which keeps positions 1..n in
/// descending recency.
#[derive(Debug)]
pub struct SegmentChain {
    segments: Vec<SegmentHandle>,
}

impl SegmentChain {
    /// A chain holding only an empty memtable
    pub fn new() -> Self {
        Self {
            segments: vec![SegmentHandle::MemTable(MemTable::new())],
        }
    }

    /// The head memtable
    pub fn memtable(&self) -> &MemTable {
        match &self.segments[0] {
            SegmentHandle::MemTable(memtable) => memtable,
            SegmentHandle::SSTable(_) => unreachable!("chain head is always the memtable"),
        }
    }

    /// The head memtable, mutably
    pub fn memtable_mut(&mut self) -> &mut MemTable {
        match &mut self.segments[0] {
            SegmentHandle::MemTable(memtable) => memtable,
            SegmentHandle::SSTable(_) => unreachable!("chain head is always the memtable"),
        }
    }

    /// Make `table` the newest SSTable, directly behind the memtable
    pub fn insert_after_head(&mut self, table: SSTable) {
        self.segments.insert(1, SegmentHandle::SSTable(table));
    }

    /// First entry for `key` found scanning head → tail, tombstones included
    pub fn resolve(&self, key: &str) -> Option<&EntryMeta> {
        for segment in &self.segments {
            if let Some(entry) = segment.lookup(key) {
                tracing::trace!(key, segment = segment.kind(), "resolved key");
                return Some(entry);
            }
        }
        None
    }

    /// Live value for `key`; a winning tombstone reads as not found
    pub fn get(&self, key: &str) -> Option<&str> {
        self.resolve(key)
            .filter(|entry| !entry.is_deleted)
            .map(|entry| entry.value.as_str())
    }

    /// All segments in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &SegmentHandle> {
        self.segments.iter()
    }

    /// SSTables in resolution order (newest first)
    pub fn sstables(&self) -> impl Iterator<Item = &SSTable> {
        self.segments.iter().filter_map(SegmentHandle::as_sstable)
    }

    /// Backing files of the SSTables, newest first
    pub fn sstable_paths(&self) -> Vec<&Path> {
        self.sstables().map(SSTable::path).collect()
    }

    /// Number of segments, memtable included (always at least 1)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl Default for SegmentChain {
    fn default() -> Self {
        Self::new()
    }
}

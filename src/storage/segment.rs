//! Segment abstraction
//!
//! The read/write seam shared by the memtable and SSTables, plus the tagged
//! handle the segment chain stores.

use crate::error::Result;
use crate::memtable::{EntryMeta, MemTable};

use super::SSTable;

/// A generation of key/value data that can answer point lookups
pub trait Segment {
    /// Raw entry for `key`, tombstones included.
    ///
    /// Chain resolution stops at the first segment returning `Some`, so a
    /// tombstone here shadows every older segment.
    fn lookup(&self, key: &str) -> Option<&EntryMeta>;

    /// Write a value. Only the memtable accepts writes.
    fn set(&mut self, key: String, value: String) -> Result<()>;

    /// Number of stored entries, tombstones included
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One element of the segment chain
#[derive(Debug)]
pub enum SegmentHandle {
    /// The single mutable segment; always at the head of the chain
    MemTable(MemTable),

    /// An immutable, flushed or loaded segment
    SSTable(SSTable),
}

impl SegmentHandle {
    /// Short name used in logs and debugging output
    pub fn kind(&self) -> &'static str {
        match self {
            SegmentHandle::MemTable(_) => "memtable",
            SegmentHandle::SSTable(_) => "sstable",
        }
    }

    /// The SSTable behind this handle, if any
    pub fn as_sstable(&self) -> Option<&SSTable> {
        match self {
            SegmentHandle::SSTable(table) => Some(table),
            SegmentHandle::MemTable(_) => None,
        }
    }
}

impl Segment for SegmentHandle {
    fn lookup(&self, key: &str) -> Option<&EntryMeta> {
        match self {
            SegmentHandle::MemTable(memtable) => memtable.lookup(key),
            SegmentHandle::SSTable(table) => table.lookup(key),
        }
    }

    fn set(&mut self, key: String, value: String) -> Result<()> {
        match self {
            SegmentHandle::MemTable(memtable) => Segment::set(memtable, key, value),
            SegmentHandle::SSTable(table) => Segment::set(table, key, value),
        }
    }

    fn len(&self) -> usize {
        match self {
            SegmentHandle::MemTable(memtable) => Segment::len(memtable),
            SegmentHandle::SSTable(table) => Segment::len(table),
        }
    }
}

//! MemTable Module
//!
//! In-memory buffer for writes that have not been flushed yet.
//!
//! ## Responsibilities
//! - Hold the newest value or tombstone for every recently written key
//! - Count slots (tombstones included) for the flush trigger
//! - Produce a sorted, immutable SSTable on flush and start over empty
//!
//! ## Data Structure Choice
//! A plain `HashMap`: insertion order is irrelevant and entries are only
//! sorted once, when the table is flushed. Concurrency is handled by the
//! engine, which owns the memtable behind its chain lock.

mod table;

use serde::{Deserialize, Serialize};

pub use table::MemTable;

/// Entry metadata: a value plus its tombstone flag
///
/// Serialized as `{"data": "...", "isDeleted": false}` inside segment files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Value payload (empty for tombstones created by a blind delete)
    #[serde(rename = "data")]
    pub value: String,

    /// Logical deletion marker
    #[serde(rename = "isDeleted", default)]
    pub is_deleted: bool,
}

impl EntryMeta {
    /// A live value
    pub fn live(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_deleted: false,
        }
    }

    /// A tombstone with an empty payload
    pub fn tombstone() -> Self {
        Self {
            value: String::new(),
            is_deleted: true,
        }
    }
}

//! Storage Module
//!
//! Immutable on-disk segments and the chain that orders them.
//!
//! ## Responsibilities
//! - Persist flushed memtables as sorted segment files
//! - Point lookups through an in-memory index per segment
//! - Resolve reads newest → oldest across memtable and SSTables
//! - Discover existing segment files on startup
//!
//! ## Layout
//! ```text
//! {data_dir}/
//!   ├── sstable-1700000000000.json   (oldest)
//!   ├── sstable-1700000004211.json
//!   └── sstable-1700000009874.json   (newest)
//! ```

mod chain;
mod directory;
mod segment;
mod sstable;

pub use chain::SegmentChain;
pub use directory::{parse_segment_timestamp, segment_file_name, SegmentDirectory};
pub use segment::{Segment, SegmentHandle};
pub use sstable::SSTable;

//! # sstkv
//!
//! An embeddable log-structured key-value store with:
//! - A mutable in-memory memtable for recent writes
//! - Immutable sorted segments (SSTables) flushed to disk as JSON
//! - Newest-first read resolution across all generations, with tombstones
//! - A tiny binary TCP protocol (GET / SET / DELETE)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (acceptor + worker pool, one msg = one read)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!   ┌──────────┬───────────────┬───────────────┬─────┐
//!   │ MemTable │ SSTable (new) │ SSTable       │ ... │   segment chain
//!   └──────────┴───────────────┴───────────────┴─────┘
//!                       │ flush
//!                       ▼
//!              data/sstable-<millis>.json
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod engine;
pub mod memtable;
pub mod network;
pub mod protocol;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use engine::Engine;
pub use error::{KvError, ProtocolError, Result};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sstkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

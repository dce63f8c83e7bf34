//! Engine Module
//!
//! The storage engine that owns the memtable, the segment chain and the
//! flush policy.
//!
//! ## Responsibilities
//! - Route writes to the memtable and flush it once it is full
//! - Resolve reads across the chain, newest segment first
//! - Load existing segment files on startup in recency order

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::storage::{parse_segment_timestamp, SSTable, SegmentChain, SegmentDirectory};

/// The main storage engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// The whole chain, memtable included, sits behind one `RwLock`.
///
/// - **Writes** (set/delete/flush): hold the write lock from the memtable
///   mutation through the threshold check, the flush and the insertion of
///   the new SSTable. No reader can see the memtable cleared before its
///   SSTable is in the chain.
/// - **Reads** (get): take the read lock and run concurrently with each
///   other. SSTables are immutable once built.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Data directory and segment file naming
    directory: SegmentDirectory,

    /// Memtable at index 0, then SSTables newest → oldest
    chain: RwLock<SegmentChain>,

    /// Timestamp of the newest segment file; names are strictly increasing
    last_segment_ms: AtomicU64,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Start a chain holding only the memtable
    /// 3. Load every segment file oldest → newest, each one inserted right
    ///    behind the memtable, which leaves the chain newest-first
    ///
    /// Any unreadable segment file aborts startup.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let directory = SegmentDirectory::open(&config.data_dir)?;
        let mut chain = SegmentChain::new();
        let mut last_segment_ms = 0;

        for path in directory.list_segments()? {
            let table = SSTable::open(&path)?;
            if let Some(timestamp) = parse_segment_timestamp(&path) {
                last_segment_ms = last_segment_ms.max(timestamp);
            }
            chain.insert_after_head(table);
        }

        tracing::info!(
            data_dir = %directory.path().display(),
            sstables = chain.len() - 1,
            max_entities_number = config.max_entities_number,
            "Engine opened"
        );

        Ok(Self {
            config,
            directory,
            chain: RwLock::new(chain),
            last_segment_ms: AtomicU64::new(last_segment_ms),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Get a value by key
    ///
    /// Scans memtable, then SSTables newest → oldest. The first segment
    /// holding any entry for the key decides: a tombstone there means not
    /// found, even if an older segment still has a value.
    pub fn get(&self, key: &str) -> Option<String> {
        let chain = self.chain.read();
        let value = chain.get(key).map(str::to_owned);
        tracing::debug!(key, found = value.is_some(), "get");
        value
    }

    /// Set a key-value pair, then flush if the memtable is full
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut chain = self.chain.write();

        if !chain.memtable_mut().set(key.to_string(), value.to_string()) {
            tracing::debug!(key, "Ignoring set on a key deleted in the current memtable");
        }

        self.flush_if_full(&mut chain)?;
        Ok(())
    }

    /// Delete a key (records a tombstone), then flush if the memtable is full
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut chain = self.chain.write();
        chain.memtable_mut().delete(key.to_string());
        self.flush_if_full(&mut chain)?;
        Ok(())
    }

    /// Flush only if the memtable reached `max_entities_number` slots
    ///
    /// Returns whether a new SSTable was produced.
    pub fn flush_memtable_conditionally(&self) -> Result<bool> {
        let mut chain = self.chain.write();
        self.flush_if_full(&mut chain)
    }

    /// Flush memtable to disk regardless of its size
    ///
    /// Returns whether a new SSTable was produced (false when empty).
    pub fn flush(&self) -> Result<bool> {
        let mut chain = self.chain.write();
        self.flush_locked(&mut chain)
    }

    /// Flush any buffered writes so they survive a restart
    pub fn close(&self) -> Result<()> {
        if self.flush()? {
            tracing::info!("Flushed memtable on close");
        }
        Ok(())
    }

    fn flush_if_full(&self, chain: &mut SegmentChain) -> Result<bool> {
        if chain.memtable().len() < self.config.max_entities_number {
            return Ok(false);
        }
        self.flush_locked(chain)
    }

    /// Internal flush implementation (called with the write lock held)
    fn flush_locked(&self, chain: &mut SegmentChain) -> Result<bool> {
        if chain.memtable().is_empty() {
            return Ok(false);
        }

        let path = self.directory.segment_path(self.next_segment_timestamp()?);
        let Some(table) = chain.memtable_mut().flush_to_sstable(&path)? else {
            return Ok(false);
        };

        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "Flushed memtable to SSTable"
        );
        chain.insert_after_head(table);
        Ok(true)
    }

    /// Current wall-clock millis, bumped past the previous segment if needed
    fn next_segment_timestamp(&self) -> Result<u64> {
        let now = unix_millis();
        let mut next = now;
        self.last_segment_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                next = now.max(last.checked_add(1)?);
                Some(next)
            })
            .map(|_| next)
            .map_err(|last| {
                KvError::Storage(format!("No segment file name left after timestamp {}", last))
            })
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        self.directory.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Memtable slot count, tombstones included
    pub fn memtable_len(&self) -> usize {
        self.chain.read().memtable().len()
    }

    /// Get the number of SSTables
    pub fn sstable_count(&self) -> usize {
        self.chain.read().sstables().count()
    }

    /// SSTable files in chain order (newest first)
    pub fn sstable_paths(&self) -> Vec<PathBuf> {
        self.chain
            .read()
            .sstable_paths()
            .into_iter()
            .map(Path::to_path_buf)
            .collect()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

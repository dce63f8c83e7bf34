//! SSTable Reader
//!
//! Loads a segment file and rebuilds its in-memory index.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{KvError, Result};
use crate::memtable::EntryMeta;

use super::SSTable;

impl SSTable {
    /// Open an existing segment file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut table = SSTable::new(path.as_ref(), Vec::new());
        table.read_from_disk()?;
        Ok(table)
    }

    /// Reload entries from the backing file.
    ///
    /// Fails if the file is missing, is not a JSON array of
    /// `[key, {data, isDeleted}]` pairs, or lists a key twice. Entry order
    /// is not checked. On failure the table keeps its previous contents.
    pub fn read_from_disk(&mut self) -> Result<()> {
        let bytes = fs::read(&self.path)?;
        let entries: Vec<(String, EntryMeta)> = serde_json::from_slice(&bytes)?;

        if let Some(key) = first_duplicate_key(&entries) {
            return Err(KvError::Storage(format!(
                "SSTable {} lists key {:?} more than once",
                self.path.display(),
                key
            )));
        }

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Loaded SSTable"
        );

        self.replace_entries(entries);
        Ok(())
    }
}

fn first_duplicate_key(entries: &[(String, EntryMeta)]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .map(|(key, _)| key.as_str())
        .find(|key| !seen.insert(*key))
}

//! SSTable Writer
//!
//! Serializes a segment to its backing file in one shot.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use crate::error::{KvError, Result};

use super::SSTable;

impl SSTable {
    /// Write all entries to the backing file, replacing any previous content
    pub fn write_to_disk(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.entries)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            KvError::Storage(format!("Failed to flush SSTable: {}", e))
        })?;
        file.sync_all()?;

        tracing::debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "Wrote SSTable"
        );
        Ok(())
    }
}

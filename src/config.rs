//! Configuration for sstkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data/";

/// Default number of memtable slots that triggers a flush
pub const DEFAULT_MAX_ENTITIES_NUMBER: usize = 100;

/// Default TCP port for the server and the CLI
pub const DEFAULT_PORT: u16 = 12345;

/// Main configuration for an sstkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one `sstable-<millis>.json` file per flush
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Memtable slot count (tombstones included) at which a flush happens
    pub max_entities_number: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen host
    pub host: String,

    /// TCP listen port
    pub port: u16,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Open connections allowed at once; further clients are turned away
    pub max_connections: usize,

    /// Close a connection after this long without a message (milliseconds, 0 = never)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_entities_number: DEFAULT_MAX_ENTITIES_NUMBER,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            worker_threads: 4,
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the engine or server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_entities_number == 0 {
            return Err(KvError::Config(
                "max_entities_number must be at least 1".to_string(),
            ));
        }
        if self.worker_threads == 0 {
            return Err(KvError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(KvError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the memtable flush threshold (entry count)
    pub fn max_entities_number(mut self, count: usize) -> Self {
        self.config.max_entities_number = count;
        self
    }

    /// Set the TCP listen host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the TCP listen port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the size of the connection worker pool
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set how many connections may be open at once
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the idle timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! sstkv Server Binary
//!
//! Starts the TCP server for sstkv.

use std::sync::Arc;

use clap::Parser;
use sstkv::config::{DEFAULT_DATA_DIR, DEFAULT_MAX_ENTITIES_NUMBER, DEFAULT_PORT};
use sstkv::network::Server;
use sstkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// sstkv Server
#[derive(Parser, Debug)]
#[command(name = "sstkv-server")]
#[command(about = "Log-structured key-value store server")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    /// Listen host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Memtable entries (tombstones included) that trigger a flush
    #[arg(short, long, default_value_t = DEFAULT_MAX_ENTITIES_NUMBER)]
    max_entities: usize,

    /// Connection worker threads
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sstkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("sstkv Server v{}", sstkv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .host(&args.host)
        .port(args.port)
        .max_entities_number(args.max_entities)
        .worker_threads(args.workers)
        .build();

    // Open engine; a failed bootstrap keeps the server from starting
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, Arc::clone(&engine)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl+C stops the acceptor; the memtable is flushed below
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.shutdown();
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
    }

    tracing::info!("Flushing memtable");
    if let Err(e) = engine.close() {
        tracing::error!("Failed to flush memtable: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

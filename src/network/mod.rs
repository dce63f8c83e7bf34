//! Network Module
//!
//! TCP server, per-connection handling and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool shared by all open connections, one message per turn
//! - Each message decoded and run directly against the Engine

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::{Connection, ConnectionState, IDLE_POLL_INTERVAL};
pub use server::{Server, ShutdownHandle};

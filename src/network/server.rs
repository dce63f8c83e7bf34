//! TCP Server
//!
//! Accepts connections and shares them across a fixed pool of workers.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use super::{Connection, ConnectionState};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};

/// How long the acceptor and idle workers wait before rechecking shutdown
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Cloneable flag that stops [`Server::run`]
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Ask the acceptor and the workers to stop
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// TCP server for sstkv
///
/// One acceptor thread (the caller of [`Server::run`]) hands sockets to a
/// fixed pool of workers over a channel. A worker serves at most one message
/// per turn and then puts the connection back on the channel, so every open
/// connection is served no matter how many clients sit idle.
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;

        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .map_err(|e| KvError::Network(format!("Failed to bind {}: {}", addr, e)))?;
        // Non-blocking accept so the loop can notice a shutdown request
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: ShutdownHandle::default(),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Accept connections until shutdown is requested (blocking)
    ///
    /// Workers notice the shutdown on their own and exit, closing the
    /// connections they still hold; this call does not wait for them.
    pub fn run(&self) -> Result<()> {
        let (sender, receiver) = channel::unbounded::<Connection>();
        let open_connections = Arc::new(AtomicUsize::new(0));

        for id in 0..self.config.worker_threads {
            let worker = Worker {
                receiver: receiver.clone(),
                sender: sender.clone(),
                shutdown: self.shutdown.clone(),
                open_connections: Arc::clone(&open_connections),
            };

            thread::Builder::new()
                .name(format!("sstkv-worker-{}", id))
                .spawn(move || worker.run())?;
        }

        tracing::info!(
            addr = %self.local_addr()?,
            workers = self.config.worker_threads,
            "Server listening"
        );

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if open_connections.load(Ordering::SeqCst) >= self.config.max_connections {
                        tracing::warn!("Rejecting {}: too many open connections", peer);
                        continue;
                    }

                    let Some(connection) = self.prepare(stream, peer) else {
                        continue;
                    };

                    open_connections.fetch_add(1, Ordering::SeqCst);
                    if sender.send(connection).is_err() {
                        return Err(KvError::Network("Worker pool has exited".to_string()));
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                }
            }
        }

        tracing::info!("Server stopped accepting connections");
        Ok(())
    }

    fn prepare(&self, stream: TcpStream, peer: SocketAddr) -> Option<Connection> {
        // Accepted sockets may inherit the listener's non-blocking mode
        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!("Dropping connection from {}: {}", peer, e);
            return None;
        }

        let mut connection = match Connection::new(stream, Arc::clone(&self.engine)) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("Failed to set up connection from {}: {}", peer, e);
                return None;
            }
        };

        if let Err(e) =
            connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)
        {
            tracing::warn!("Failed to set timeouts for {}: {}", peer, e);
        }

        Some(connection)
    }
}

/// One pool thread: takes a connection, serves one turn, hands it back
struct Worker {
    receiver: Receiver<Connection>,
    sender: Sender<Connection>,
    shutdown: ShutdownHandle,
    open_connections: Arc<AtomicUsize>,
}

impl Worker {
    fn run(self) {
        while !self.shutdown.is_shutdown() {
            let mut connection = match self.receiver.recv_timeout(ACCEPT_POLL_INTERVAL) {
                Ok(connection) => connection,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            match connection.serve_next() {
                Ok(ConnectionState::Served) | Ok(ConnectionState::Idle) => {
                    if self.sender.send(connection).is_err() {
                        self.release();
                        break;
                    }
                }
                Ok(ConnectionState::Closed) => self.release(),
                Err(e) => {
                    tracing::warn!(
                        "Connection {} ended with error: {}",
                        connection.peer_addr(),
                        e
                    );
                    self.release();
                }
            }
        }

        tracing::debug!("Worker exiting");
    }

    fn release(&self) {
        self.open_connections.fetch_sub(1, Ordering::SeqCst);
    }
}

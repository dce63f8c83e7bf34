//! TCP Client
//!
//! Blocking client: one request out, one response back.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::Result;
use crate::protocol::{read_response, write_command, write_frame, Command, Response};

/// Connection to an sstkv server
pub struct Client {
    stream: TcpStream,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Bound how long [`Client::send`] waits for a response (`None` = forever)
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Send a command and wait for its response
    pub fn send(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.stream, command)?;
        read_response(&mut self.stream)
    }

    /// Send already-encoded bytes and wait for the response
    pub fn send_raw(&mut self, message: &[u8]) -> Result<Response> {
        write_frame(&mut self.stream, message)?;
        read_response(&mut self.stream)
    }

    pub fn get(&mut self, key: &str) -> Result<Response> {
        self.send(&Command::Get {
            key: key.to_string(),
        })
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<Response> {
        self.send(&Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn delete(&mut self, key: &str) -> Result<Response> {
        self.send(&Command::Delete {
            key: key.to_string(),
        })
    }
}

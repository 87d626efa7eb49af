//! Configuration structs for the codec and the UDP transport.
//!
//! Every struct has a `Default` that matches the values the binaries use
//! when no flag overrides them.

use std::net::SocketAddr;
use std::time::Duration;

/// Largest UDP payload over IPv4
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Checked-read behaviour of the message accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Log an error when a checked read asks for an index past the end.
    /// Reads return the default value either way.
    pub safety_checks: bool,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self { safety_checks: true }
    }
}

impl ReadConfig {
    /// Low-overhead mode: out-of-range reads return defaults silently
    pub const UNCHECKED: ReadConfig = ReadConfig { safety_checks: false };
}

/// Outgoing buffer sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Fixed writer capacity in bytes
    pub capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { capacity: 4096 }
    }
}

/// UDP sender configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Destination host, IPv4 literal
    pub host: String,
    /// Destination port
    pub port: u16,
    pub writer: WriterConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            writer: WriterConfig::default(),
        }
    }
}

/// UDP receive loop configuration
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    pub bind_addr: SocketAddr,
    /// Size of the reused receive buffer; longer datagrams are truncated
    /// by the kernel and then rejected by the decoder
    pub buffer_size: usize,
    /// SO_RCVBUF request in bytes (unix only, `None` keeps the OS default)
    pub socket_recv_buffer: Option<usize>,
    /// Upper bound on a single `poll_once` wait
    pub poll_timeout: Duration,
    pub read: ReadConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            buffer_size: MAX_DATAGRAM_SIZE,
            socket_recv_buffer: Some(256 * 1024),
            poll_timeout: Duration::from_millis(100),
            read: ReadConfig::default(),
        }
    }
}

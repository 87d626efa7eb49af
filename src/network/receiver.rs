//! OSC receive loop with event-driven I/O
//!
//! Menggunakan mio untuk non-blocking UDP polling.
//!
//! One receive buffer is reused for every datagram. Each decoded message is
//! lent to the handler for the duration of the call only: the next datagram
//! overwrites the buffer, so the borrow checker rejects any attempt to keep
//! the `OscMessage` around. Copy out what must outlive the callback.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use log::{debug, info, warn};
use mio::net::UdpSocket as MioUdpSocket;
use mio::{Events, Interest, Poll, Token};

use crate::config::ReceiverConfig;
use crate::protocol::{Decoder, OscMessage};

const SOCKET_TOKEN: Token = Token(0);
const EVENTS_CAPACITY: usize = 64;

/// Receive counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    pub datagrams_received: u64,
    pub messages_decoded: u64,
    /// Datagrams rejected by the decoder
    pub messages_dropped: u64,
    pub bytes_received: u64,
}

/// UDP receiver
pub struct OscReceiver {
    poll: Poll,
    socket: MioUdpSocket,
    events: Events,
    buffer: Box<[u8]>,
    decoder: Decoder,
    stats: ReceiverStats,
    poll_timeout: Duration,
}

impl OscReceiver {
    /// Bind and register the socket
    pub fn bind(config: &ReceiverConfig) -> io::Result<Self> {
        let poll = Poll::new()?;

        let socket = UdpSocket::bind(config.bind_addr)?;
        socket.set_nonblocking(true)?;

        if let Some(bytes) = config.socket_recv_buffer {
            // Not all platforms honour this
            if let Err(e) = set_recv_buffer(&socket, bytes) {
                warn!("could not set SO_RCVBUF to {}: {}", bytes, e);
            }
        }

        let mut socket = MioUdpSocket::from_std(socket);
        poll.registry()
            .register(&mut socket, SOCKET_TOKEN, Interest::READABLE)?;

        info!("OSC receiver listening on {}", socket.local_addr()?);

        Ok(Self {
            poll,
            socket,
            events: Events::with_capacity(EVENTS_CAPACITY),
            buffer: vec![0u8; config.buffer_size].into_boxed_slice(),
            decoder: Decoder::with_config(config.read),
            stats: ReceiverStats::default(),
            poll_timeout: config.poll_timeout,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Wait up to `timeout` for datagrams and dispatch every decodable one.
    ///
    /// Returns the number of messages handed to `handler`. Malformed datagrams
    /// are counted and dropped.
    pub fn poll_once<F>(&mut self, timeout: Option<Duration>, mut handler: F) -> io::Result<usize>
    where
        F: FnMut(SocketAddr, &OscMessage<'_>),
    {
        match self.poll.poll(&mut self.events, timeout) {
            Ok(()) => {}
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => return Ok(0),
            Err(e) => return Err(e),
        }

        let readable = self
            .events
            .iter()
            .any(|event| event.token() == SOCKET_TOKEN && event.is_readable());
        if !readable {
            return Ok(0);
        }

        // Edge-triggered: drain until WouldBlock
        let mut handled = 0;
        loop {
            match self.socket.recv_from(&mut self.buffer) {
                Ok((len, from)) => {
                    if self.dispatch(len, from, &mut handler) {
                        handled += 1;
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(handled)
    }

    /// Run the receive loop forever
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(SocketAddr, &OscMessage<'_>),
    {
        loop {
            self.poll_once(Some(self.poll_timeout), &mut handler)?;
        }
    }

    fn dispatch<F>(&mut self, len: usize, from: SocketAddr, handler: &mut F) -> bool
    where
        F: FnMut(SocketAddr, &OscMessage<'_>),
    {
        self.stats.datagrams_received += 1;
        self.stats.bytes_received += len as u64;

        match self.decoder.decode(&self.buffer[..len]) {
            Ok(message) => {
                self.stats.messages_decoded += 1;
                handler(from, &message);
                true
            }
            Err(e) => {
                self.stats.messages_dropped += 1;
                debug!("dropping {} byte datagram from {}: {}", len, from, e);
                false
            }
        }
    }
}

#[cfg(unix)]
fn set_recv_buffer(socket: &UdpSocket, bytes: usize) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let optval = libc::c_int::try_from(bytes).unwrap_or(libc::c_int::MAX);
    // SAFETY: valid fd owned by `socket`, optval outlives the call
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            &optval as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_recv_buffer(_socket: &UdpSocket, _bytes: usize) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Element, Writer};

    fn loopback_receiver() -> OscReceiver {
        let config = ReceiverConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            buffer_size: 1024,
            ..ReceiverConfig::default()
        };
        OscReceiver::bind(&config).unwrap()
    }

    #[test]
    fn test_dispatch_counts_drops() {
        let mut receiver = loopback_receiver();
        let from = SocketAddr::from(([127, 0, 0, 1], 1));

        let mut writer = Writer::new(64);
        let good = writer.write_message("/ok", &[Element::Int32(9)]).unwrap().to_vec();
        receiver.buffer[..good.len()].copy_from_slice(&good);

        let mut seen = Vec::new();
        let mut handler = |_: SocketAddr, msg: &OscMessage<'_>| {
            seen.push((msg.address().to_string(), msg.values().read_int32_element(0)));
        };
        assert!(receiver.dispatch(good.len(), from, &mut handler));

        receiver.buffer[..4].copy_from_slice(b"junk");
        assert!(!receiver.dispatch(4, from, &mut handler));

        assert_eq!(seen, vec![("/ok".to_string(), 9)]);
        let stats = receiver.stats();
        assert_eq!(stats.datagrams_received, 2);
        assert_eq!(stats.messages_decoded, 1);
        assert_eq!(stats.messages_dropped, 1);
        assert_eq!(stats.bytes_received, good.len() as u64 + 4);
    }

    #[test]
    fn test_poll_timeout_without_traffic() {
        let mut receiver = loopback_receiver();
        let handled = receiver
            .poll_once(Some(Duration::from_millis(10)), |_, _| {})
            .unwrap();
        assert_eq!(handled, 0);
    }
}

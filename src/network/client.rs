//! UDP sender with a single reusable writer.
//!
//! Every send resets the writer, builds the message and hands the bytes to a
//! connected socket. Nothing is allocated per message.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use log::info;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::protocol::{
    Color32, Element, MidiMessage, ProtocolError, Vector2, Vector3, Writer,
};

/// Errors raised while sending
#[derive(Error, Debug)]
pub enum ClientError {
    /// Destination host is not an IP literal
    #[error("invalid destination host {0:?}")]
    InvalidHost(String),

    /// Message could not be encoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Socket setup or send failed
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Sends OSC messages to one destination
pub struct OscClient {
    socket: UdpSocket,
    destination: SocketAddr,
    writer: Writer,
    messages_sent: u64,
}

impl OscClient {
    /// Connect to `host:port` with the default writer capacity
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::with_config(&ClientConfig {
            host: host.to_string(),
            port,
            ..ClientConfig::default()
        })
    }

    /// Bind an ephemeral local port and connect it to the destination.
    /// Broadcast is enabled when the destination is 255.255.255.255.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let ip: IpAddr = config
            .host
            .parse()
            .map_err(|_| ClientError::InvalidHost(config.host.clone()))?;
        let destination = SocketAddr::new(ip, config.port);

        let local: SocketAddr = match ip {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        if ip == IpAddr::V4(Ipv4Addr::BROADCAST) {
            socket.set_broadcast(true)?;
        }
        socket.connect(destination)?;

        info!("OSC client {} -> {}", socket.local_addr()?, destination);

        Ok(Self {
            socket,
            destination,
            writer: Writer::with_config(&config.writer),
            messages_sent: 0,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Direct access to the writer for hand-built messages; follow with
    /// [`OscClient::send_written`].
    pub fn writer(&mut self) -> &mut Writer {
        &mut self.writer
    }

    /// Send whatever the writer currently holds
    pub fn send_written(&mut self) -> Result<()> {
        let bytes = self.writer.as_bytes();
        let sent = self.socket.send(bytes)?;
        if sent != bytes.len() {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "datagram truncated on send").into());
        }
        self.messages_sent += 1;
        Ok(())
    }

    /// Encode and send one message
    pub fn send(&mut self, address: &str, elements: &[Element<'_>]) -> Result<()> {
        self.writer.write_message(address, elements)?;
        self.send_written()
    }

    /// Message with no elements (type-tag string `,`)
    pub fn send_empty(&mut self, address: &str) -> Result<()> {
        self.send(address, &[])
    }

    pub fn send_int32(&mut self, address: &str, value: i32) -> Result<()> {
        self.send(address, &[Element::Int32(value)])
    }

    pub fn send_float32(&mut self, address: &str, value: f32) -> Result<()> {
        self.send(address, &[Element::Float32(value)])
    }

    pub fn send_string(&mut self, address: &str, value: &str) -> Result<()> {
        self.send(address, &[Element::String(value)])
    }

    pub fn send_blob(&mut self, address: &str, bytes: &[u8]) -> Result<()> {
        self.send(address, &[Element::Blob(bytes)])
    }

    pub fn send_int64(&mut self, address: &str, value: i64) -> Result<()> {
        self.send(address, &[Element::Int64(value)])
    }

    pub fn send_float64(&mut self, address: &str, value: f64) -> Result<()> {
        self.send(address, &[Element::Float64(value)])
    }

    /// Sent as `,ff`
    pub fn send_vector2(&mut self, address: &str, value: Vector2) -> Result<()> {
        self.writer.reset();
        self.writer.write_address(address)?;
        self.writer.write_type_tags(",ff")?;
        self.writer.write_vector2(value)?;
        self.send_written()
    }

    /// Sent as `,fff`
    pub fn send_vector3(&mut self, address: &str, value: Vector3) -> Result<()> {
        self.writer.reset();
        self.writer.write_address(address)?;
        self.writer.write_type_tags(",fff")?;
        self.writer.write_vector3(value)?;
        self.send_written()
    }

    pub fn send_color32(&mut self, address: &str, value: Color32) -> Result<()> {
        self.send(address, &[Element::Color32(value)])
    }

    pub fn send_midi(&mut self, address: &str, value: MidiMessage) -> Result<()> {
        self.send(address, &[Element::Midi(value)])
    }

    pub fn send_char(&mut self, address: &str, value: char) -> Result<()> {
        self.send(address, &[Element::Char(value)])
    }

    /// Sent as `,T` or `,F` with no payload
    pub fn send_bool(&mut self, address: &str, value: bool) -> Result<()> {
        self.send(address, &[Element::Bool(value)])
    }

    pub fn send_nil(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Element::Nil])
    }

    pub fn send_infinitum(&mut self, address: &str) -> Result<()> {
        self.send(address, &[Element::Infinitum])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_hostname() {
        assert!(matches!(
            OscClient::connect("localhost", 9000),
            Err(ClientError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_encode_error_surfaces() {
        let mut client = OscClient::connect("127.0.0.1", 9).unwrap();
        assert!(matches!(
            client.send_int32("no-slash", 1),
            Err(ClientError::Protocol(ProtocolError::InvalidAddress(_)))
        ));
        assert_eq!(client.messages_sent(), 0);
    }
}

//! oscwire - Open Sound Control 1.0 message codec
//!
//! Arsitektur:
//! - Writer: builds padded OSC messages into one reusable buffer
//! - Decoder: indexes a received datagram once (tag + offset per element)
//! - MessageValues: type-checked, allocation-free reads against that index
//! - Network: thin UDP sender and mio-polled receive loop around the codec

pub mod config;
pub mod network;
pub mod protocol;

pub use config::{ClientConfig, ReadConfig, ReceiverConfig, WriterConfig};
pub use protocol::{
    Color32, Decoder, Element, MessageValues, MidiMessage, OscMessage, ProtocolError, TimeTag,
    TypeTag, Vector2, Vector3, Writer,
};

//! Protocol Layer: OSC 1.0 message encoding
//!
//! Prinsip desain:
//! - 4-byte aligned fields, all numbers big-endian
//! - No allocation: the writer fills a fixed buffer, the decoder reuses its index
//! - Zero-copy reads: elements are read in place from the received datagram

mod decoder;
mod element;
mod errors;
mod type_tag;
mod values;
mod writer;

pub use decoder::{Decoder, OscMessage};
pub use element::{Color32, Element, MidiMessage, TimeTag, Vector2, Vector3};
pub use errors::{Malformation, ProtocolError, Result};
pub use type_tag::{padded_len, TypeTag, ALIGNMENT};
pub use values::MessageValues;
pub use writer::Writer;

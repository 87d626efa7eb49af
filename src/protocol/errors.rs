//! Error types for the OSC codec.
//!
//! Encode-time errors are returned to the caller. Decode-time errors stay
//! inside the decoder: it reports them, empties its index, and the receive
//! loop keeps running.

use thiserror::Error;

/// The framing fault found while indexing a received datagram.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    /// Datagram has no bytes at all
    #[error("empty datagram")]
    Empty,

    /// Address does not start with `/`
    #[error("address must start with '/'")]
    AddressPrefix,

    /// Address is not valid UTF-8
    #[error("address is not valid UTF-8")]
    AddressEncoding,

    /// Type-tag string is missing its leading `,`
    #[error("type-tag string must start with ','")]
    MissingTypeTags,

    /// Type-tag string contains a character outside the supported set
    #[error("unknown type tag {0:?}")]
    UnknownTag(char),

    /// A null terminator was not found before the end of the datagram
    #[error("unterminated string at offset {offset}")]
    Unterminated {
        /// Offset where the scan started
        offset: usize,
    },

    /// A field (or its padding) extends past the end of the datagram
    #[error("field at offset {offset} needs {needed} bytes, only {available} remain")]
    Truncated {
        /// Offset of the field start
        offset: usize,
        /// Bytes the field claims
        needed: usize,
        /// Bytes left in the datagram
        available: usize,
    },
}

/// Protocol-level errors raised while building or indexing OSC messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Received datagram violates OSC framing
    #[error("malformed message: {0}")]
    MalformedMessage(Malformation),

    /// Writing would exceed the writer's fixed capacity
    #[error("buffer overflow: need {needed} bytes, only {available} available")]
    BufferOverflow {
        /// Bytes the write requires
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Address is empty or does not start with `/`
    #[error("invalid address {0:?}: must be non-empty and start with '/'")]
    InvalidAddress(String),

    /// Type-tag string is missing its `,` or names an unknown tag
    #[error("invalid type-tag string {0:?}")]
    InvalidTypeTags(String),

    /// String element contains an interior NUL and could not be decoded back
    #[error("string contains an interior NUL byte")]
    InvalidString,
}

impl From<Malformation> for ProtocolError {
    fn from(reason: Malformation) -> Self {
        ProtocolError::MalformedMessage(reason)
    }
}

/// Convenient Result type alias for codec operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

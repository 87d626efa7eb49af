//! Zero-copy decoder: indexes a received datagram once.
//!
//! Layout of an OSC message:
//! ┌─────────────────────────────────────────────────────┐
//! │ address      "/a/b" NUL, padded to 4                │
//! ├─────────────────────────────────────────────────────┤
//! │ type tags    ",ifs" NUL, padded to 4                │
//! ├─────────────────────────────────────────────────────┤
//! │ element payloads, each starting 4-byte aligned      │
//! └─────────────────────────────────────────────────────┘
//!
//! The decoder walks the tag string and records one `(tag, offset)` pair per
//! element. Values are read later, in place, through [`MessageValues`].

use std::fmt;

use super::errors::{Malformation, Result};
use super::type_tag::{padded_len, TypeTag};
use super::values::MessageValues;
use crate::config::ReadConfig;

/// Reusable tag/offset index builder
///
/// The index vectors are cleared and refilled on every [`Decoder::decode`],
/// so after warm-up decoding does not allocate.
#[derive(Debug, Default)]
pub struct Decoder {
    tags: Vec<TypeTag>,
    offsets: Vec<usize>,
    config: ReadConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReadConfig) -> Self {
        Self {
            tags: Vec::new(),
            offsets: Vec::new(),
            config,
        }
    }

    #[inline(always)]
    pub fn config(&self) -> ReadConfig {
        self.config
    }

    /// Elements indexed by the last `decode`, 0 if it failed
    #[inline(always)]
    pub fn element_count(&self) -> usize {
        self.tags.len()
    }

    /// Index `datagram` and return a view over it
    ///
    /// The returned message borrows both the datagram and this decoder, so it
    /// cannot be held across the next `decode`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`](super::ProtocolError::MalformedMessage)
    /// when the address or type-tag framing is invalid, a tag is unknown, or
    /// any field runs past the end of the datagram. The index is left empty.
    pub fn decode<'a>(&'a mut self, datagram: &'a [u8]) -> Result<OscMessage<'a>> {
        self.tags.clear();
        self.offsets.clear();

        match self.index(datagram) {
            Ok(address) => Ok(OscMessage {
                address,
                values: MessageValues::new(datagram, &self.tags, &self.offsets, self.config),
            }),
            Err(reason) => {
                self.tags.clear();
                self.offsets.clear();
                Err(reason.into())
            }
        }
    }

    fn index<'a>(&mut self, datagram: &'a [u8]) -> std::result::Result<&'a str, Malformation> {
        let len = datagram.len();
        if len == 0 {
            return Err(Malformation::Empty);
        }
        if datagram[0] != b'/' {
            return Err(Malformation::AddressPrefix);
        }

        // Address
        let address_end = find_nul(datagram, 0)?;
        let tags_start = field_end(0, padded_len(address_end + 1), len)?;
        let address = std::str::from_utf8(&datagram[..address_end])
            .map_err(|_| Malformation::AddressEncoding)?;

        // Type-tag string
        if datagram.get(tags_start) != Some(&b',') {
            return Err(Malformation::MissingTypeTags);
        }
        let tags_end = find_nul(datagram, tags_start)?;
        let mut cursor = field_end(tags_start, padded_len(tags_end - tags_start + 1), len)?;

        // Payloads
        for &byte in &datagram[tags_start + 1..tags_end] {
            let tag = TypeTag::from_byte(byte).ok_or(Malformation::UnknownTag(byte as char))?;
            self.tags.push(tag);
            self.offsets.push(cursor);

            let size = match tag.fixed_size() {
                Some(size) => size,
                None if tag == TypeTag::String => {
                    padded_len(find_nul(datagram, cursor)? - cursor + 1)
                }
                None => {
                    let prefix_end = field_end(cursor, 4, len)?;
                    let mut prefix = [0u8; 4];
                    prefix.copy_from_slice(&datagram[cursor..prefix_end]);
                    let blob_len = u32::from_be_bytes(prefix) as usize;
                    blob_len
                        .checked_add(3)
                        .and_then(|n| (n & !3).checked_add(4))
                        .ok_or(Malformation::Truncated {
                            offset: cursor,
                            needed: usize::MAX,
                            available: len - cursor,
                        })?
                }
            };
            cursor = field_end(cursor, size, len)?;
        }

        Ok(address)
    }
}

/// Index of the first NUL at or after `from`
#[inline(always)]
fn find_nul(datagram: &[u8], from: usize) -> std::result::Result<usize, Malformation> {
    datagram[from..]
        .iter()
        .position(|&b| b == 0)
        .map(|pos| from + pos)
        .ok_or(Malformation::Unterminated { offset: from })
}

/// End of a `size`-byte field at `offset`, if it fits in `len`
#[inline(always)]
fn field_end(offset: usize, size: usize, len: usize) -> std::result::Result<usize, Malformation> {
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(end),
        _ => Err(Malformation::Truncated {
            offset,
            needed: size,
            available: len.saturating_sub(offset),
        }),
    }
}

/// A decoded message: address plus a view over its elements
#[derive(Debug, Clone, Copy)]
pub struct OscMessage<'a> {
    address: &'a str,
    values: MessageValues<'a>,
}

impl<'a> OscMessage<'a> {
    #[inline(always)]
    pub fn address(&self) -> &'a str {
        self.address
    }

    #[inline(always)]
    pub fn values(&self) -> MessageValues<'a> {
        self.values
    }

    #[inline(always)]
    pub fn type_tags(&self) -> &'a [TypeTag] {
        self.values.tags()
    }

    #[inline(always)]
    pub fn element_count(&self) -> usize {
        self.values.element_count()
    }
}

impl fmt::Display for OscMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ,", self.address)?;
        for tag in self.type_tags() {
            write!(f, "{}", tag.as_char())?;
        }
        for element in self.values.iter() {
            write!(f, " {element}")?;
        }
        Ok(())
    }
}

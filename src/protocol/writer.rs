//! Zero-Allocation OSC Writer
//!
//! Builds an OSC message directly into a pre-allocated buffer.
//! The buffer is allocated once and reused: `reset()` only rewinds the cursor.

use super::element::{Color32, Element, MidiMessage, TimeTag, Vector2, Vector3};
use super::errors::{ProtocolError, Result};
use super::type_tag::{padded_len, TypeTag};
use crate::config::WriterConfig;

/// Pre-allocated message builder
///
/// Every `write_*` call appends at the cursor. A call that fails leaves the
/// buffer exactly as it was before the call.
pub struct Writer {
    buffer: Box<[u8]>,
    write_pos: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::with_config(&WriterConfig::default())
    }
}

impl Writer {
    /// Create a writer with a fixed buffer capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            write_pos: 0,
        }
    }

    pub fn with_config(config: &WriterConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Rewind to an empty message. Does not touch the allocation.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.write_pos = 0;
    }

    /// Encoded bytes written so far
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.write_pos]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.write_pos
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.write_pos == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Available space in buffer
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.buffer.len() - self.write_pos
    }

    #[inline(always)]
    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.available() {
            return Err(ProtocolError::BufferOverflow {
                needed,
                available: self.available(),
            });
        }
        Ok(())
    }

    /// Copy bytes at the cursor. Caller has already checked capacity.
    #[inline(always)]
    fn put(&mut self, bytes: &[u8]) {
        let end = self.write_pos + bytes.len();
        self.buffer[self.write_pos..end].copy_from_slice(bytes);
        self.write_pos = end;
    }

    /// Zero-fill up to the next 4-byte boundary. Stale bytes from a
    /// previous message may sit in the reused buffer.
    #[inline(always)]
    fn pad(&mut self) {
        let end = padded_len(self.write_pos);
        self.buffer[self.write_pos..end].fill(0);
        self.write_pos = end;
    }

    /// NUL-terminated, padded string field
    fn put_padded_str(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(padded_len(bytes.len() + 1))?;
        self.put(bytes);
        self.put(&[0]);
        self.pad();
        Ok(())
    }

    /// Write the address pattern
    pub fn write_address(&mut self, address: &str) -> Result<()> {
        if !address.starts_with('/') || address.contains('\0') {
            return Err(ProtocolError::InvalidAddress(address.to_string()));
        }
        self.put_padded_str(address.as_bytes())
    }

    /// Write a type-tag string such as `",ifs"`
    pub fn write_type_tags(&mut self, tags: &str) -> Result<()> {
        let valid = tags.as_bytes().split_first().is_some_and(|(&comma, rest)| {
            comma == b',' && rest.iter().all(|&b| TypeTag::from_byte(b).is_some())
        });
        if !valid {
            return Err(ProtocolError::InvalidTypeTags(tags.to_string()));
        }
        self.put_padded_str(tags.as_bytes())
    }

    #[inline(always)]
    pub fn write_int32(&mut self, value: i32) -> Result<()> {
        self.ensure(4)?;
        self.put(&value.to_be_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_float32(&mut self, value: f32) -> Result<()> {
        self.ensure(4)?;
        self.put(&value.to_be_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_int64(&mut self, value: i64) -> Result<()> {
        self.ensure(8)?;
        self.put(&value.to_be_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_float64(&mut self, value: f64) -> Result<()> {
        self.ensure(8)?;
        self.put(&value.to_be_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_timestamp(&mut self, value: TimeTag) -> Result<()> {
        self.ensure(8)?;
        self.put(&value.as_u64().to_be_bytes());
        Ok(())
    }

    /// Characters go out as a 32-bit code point; ASCII lands in the low byte.
    #[inline(always)]
    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.ensure(4)?;
        self.put(&u32::from(value).to_be_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_color32(&mut self, value: Color32) -> Result<()> {
        self.ensure(4)?;
        self.put(&value.to_bytes());
        Ok(())
    }

    #[inline(always)]
    pub fn write_midi(&mut self, value: MidiMessage) -> Result<()> {
        self.ensure(4)?;
        self.put(&value.to_bytes());
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(ProtocolError::InvalidString);
        }
        self.put_padded_str(value.as_bytes())
    }

    /// Length-prefixed blob, padded to a multiple of 4
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<()> {
        let overflow = ProtocolError::BufferOverflow {
            needed: 4 + padded_len(bytes.len()),
            available: self.available(),
        };
        let len = u32::try_from(bytes.len()).map_err(|_| overflow)?;
        self.ensure(4 + padded_len(bytes.len()))?;
        self.put(&len.to_be_bytes());
        self.put(bytes);
        self.pad();
        Ok(())
    }

    /// Two consecutive float32 fields
    pub fn write_vector2(&mut self, value: Vector2) -> Result<()> {
        self.ensure(8)?;
        self.put(&value.x.to_be_bytes());
        self.put(&value.y.to_be_bytes());
        Ok(())
    }

    /// Three consecutive float32 fields
    pub fn write_vector3(&mut self, value: Vector3) -> Result<()> {
        self.ensure(12)?;
        self.put(&value.x.to_be_bytes());
        self.put(&value.y.to_be_bytes());
        self.put(&value.z.to_be_bytes());
        Ok(())
    }

    /// Write the payload of one element. Tag-only elements write nothing.
    pub fn write_element(&mut self, element: &Element<'_>) -> Result<()> {
        match *element {
            Element::Int32(v) => self.write_int32(v),
            Element::Float32(v) => self.write_float32(v),
            Element::String(v) => self.write_string(v),
            Element::Blob(v) => self.write_blob(v),
            Element::Int64(v) => self.write_int64(v),
            Element::Float64(v) => self.write_float64(v),
            Element::TimeTag(v) => self.write_timestamp(v),
            Element::Char(v) => self.write_char(v),
            Element::Color32(v) => self.write_color32(v),
            Element::Midi(v) => self.write_midi(v),
            Element::Bool(_) | Element::Nil | Element::Infinitum => Ok(()),
        }
    }

    /// Type-tag string derived from the elements, written without allocating
    fn write_tags_for(&mut self, elements: &[Element<'_>]) -> Result<()> {
        self.ensure(padded_len(elements.len() + 2))?;
        self.put(b",");
        for element in elements {
            self.put(&[element.tag().as_byte()]);
        }
        self.put(&[0]);
        self.pad();
        Ok(())
    }

    /// Reset and encode a complete message
    ///
    /// On error the writer is left empty.
    pub fn write_message(&mut self, address: &str, elements: &[Element<'_>]) -> Result<&[u8]> {
        self.reset();
        let written = self.write_address(address).and_then(|()| {
            self.write_tags_for(elements)?;
            elements.iter().try_for_each(|e| self.write_element(e))
        });

        if let Err(e) = written {
            self.reset();
            return Err(e);
        }

        Ok(self.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_padding() {
        let mut writer = Writer::new(64);
        writer.write_address("/synth/freq").unwrap();
        assert_eq!(writer.as_bytes(), b"/synth/freq\0");

        writer.reset();
        writer.write_address("/abc").unwrap();
        assert_eq!(writer.as_bytes(), b"/abc\0\0\0\0");
    }

    #[test]
    fn test_reject_bad_address() {
        let mut writer = Writer::new(64);
        assert!(matches!(
            writer.write_address(""),
            Err(ProtocolError::InvalidAddress(_))
        ));
        assert!(matches!(
            writer.write_address("synth"),
            Err(ProtocolError::InvalidAddress(_))
        ));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_type_tags() {
        let mut writer = Writer::new(64);
        writer.write_type_tags(",").unwrap();
        assert_eq!(writer.as_bytes(), b",\0\0\0");

        writer.reset();
        writer.write_type_tags(",iii").unwrap();
        assert_eq!(writer.as_bytes(), b",iii\0\0\0\0");

        assert!(matches!(
            writer.write_type_tags("if"),
            Err(ProtocolError::InvalidTypeTags(_))
        ));
        assert!(matches!(
            writer.write_type_tags(",iq"),
            Err(ProtocolError::InvalidTypeTags(_))
        ));
    }

    #[test]
    fn test_numeric_big_endian() {
        let mut writer = Writer::new(64);
        writer.write_int32(1).unwrap();
        writer.write_float32(440.0).unwrap();
        writer.write_int64(-2).unwrap();
        assert_eq!(
            writer.as_bytes(),
            &[0, 0, 0, 1, 0x43, 0xDC, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_blob_padding() {
        let mut writer = Writer::new(64);
        writer.write_blob(&[1, 2, 3]).unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 3, 1, 2, 3, 0]);

        writer.reset();
        writer.write_blob(&[]).unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_char_low_byte() {
        let mut writer = Writer::new(8);
        writer.write_char('A').unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, b'A']);
    }

    #[test]
    fn test_string_rejects_nul() {
        let mut writer = Writer::new(64);
        assert_eq!(writer.write_string("a\0b"), Err(ProtocolError::InvalidString));
    }

    #[test]
    fn test_overflow_leaves_buffer_untouched() {
        let mut writer = Writer::new(8);
        writer.write_int32(7).unwrap();

        let err = writer.write_blob(&[0u8; 16]).unwrap_err();
        assert_eq!(err, ProtocolError::BufferOverflow { needed: 20, available: 4 });
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 7]);

        assert!(writer.write_int64(1).is_err());
        assert!(writer.write_vector2(Vector2::default()).is_err());
        assert_eq!(writer.len(), 4);
    }

    #[test]
    fn test_tag_only_elements_write_no_payload() {
        let mut writer = Writer::new(64);
        let bytes = writer
            .write_message("/x", &[Element::Bool(true), Element::Nil, Element::Infinitum])
            .unwrap();
        assert_eq!(bytes, b"/x\0\0,TNI\0\0\0\0");
    }

    #[test]
    fn test_writer_reuse_clears_stale_padding() {
        let mut writer = Writer::new(64);
        writer.write_message("/long/address", &[Element::String("abcdefg")]).unwrap();
        let bytes = writer.write_message("/a", &[Element::String("b")]).unwrap();
        assert_eq!(bytes, b"/a\0\0,s\0\0b\0\0\0");
    }

    #[test]
    fn test_failed_message_resets() {
        let mut writer = Writer::new(16);
        let result = writer.write_message("/a", &[Element::Blob(&[0u8; 32])]);
        assert!(matches!(result, Err(ProtocolError::BufferOverflow { .. })));
        assert!(writer.is_empty());
    }
}

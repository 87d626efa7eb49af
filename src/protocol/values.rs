//! Type-checked, allocation-free reads of decoded message elements.
//!
//! A `MessageValues` is a view over three borrowed slices: the received
//! datagram, the tag sequence and the offset sequence built by the
//! [`Decoder`](super::Decoder). It never copies the datagram.
//!
//! Checked reads (`read_*_element`) return the type's default when the index
//! is out of range or the element has a different tag. OSC peers do not agree
//! on element types in advance, so a mismatch is not an error.
//!
//! Unchecked reads (`read_*_element_unchecked`) skip the tag comparison for
//! hot loops where the caller already looked at [`MessageValues::tag`]. They
//! stay memory safe: a violated precondition panics instead of reading
//! outside the datagram.

use log::error;

use super::element::{Color32, Element, MidiMessage, TimeTag};
use super::type_tag::TypeTag;
use crate::config::ReadConfig;

#[derive(Debug, Clone, Copy)]
pub struct MessageValues<'a> {
    buffer: &'a [u8],
    tags: &'a [TypeTag],
    offsets: &'a [usize],
    config: ReadConfig,
}

impl<'a> MessageValues<'a> {
    /// `tags` and `offsets` must come from indexing `buffer`.
    pub(crate) fn new(
        buffer: &'a [u8],
        tags: &'a [TypeTag],
        offsets: &'a [usize],
        config: ReadConfig,
    ) -> Self {
        debug_assert_eq!(tags.len(), offsets.len());
        Self { buffer, tags, offsets, config }
    }

    /// Number of decoded elements
    #[inline(always)]
    pub fn element_count(&self) -> usize {
        self.tags.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline(always)]
    pub fn tags(&self) -> &'a [TypeTag] {
        self.tags
    }

    #[inline(always)]
    pub fn tag(&self, index: usize) -> Option<TypeTag> {
        self.tags.get(index).copied()
    }

    /// Byte offset of the element inside the datagram
    #[inline(always)]
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    /// Offset of element `index` if it exists and carries `expected`
    #[inline(always)]
    fn checked_offset(&self, index: usize, expected: TypeTag) -> Option<usize> {
        match self.tags.get(index) {
            Some(&tag) if tag == expected => self.offsets.get(index).copied(),
            Some(_) => None,
            None => {
                self.report_out_of_range(index);
                None
            }
        }
    }

    #[cold]
    fn report_out_of_range(&self, index: usize) {
        if self.config.safety_checks {
            error!(
                "tried to read message element index {}, but there are only {} elements",
                index,
                self.element_count()
            );
        }
    }

    #[inline(always)]
    fn get_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.buffer.get(offset..end)?.try_into().ok()
    }

    /// Panics if the slot is shorter than `N` bytes.
    #[inline(always)]
    fn array_at<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buffer[offset..offset + N]);
        out
    }

    #[inline(always)]
    fn str_at(&self, offset: usize) -> &'a str {
        let tail = self.buffer.get(offset..).unwrap_or_default();
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        std::str::from_utf8(&tail[..end]).unwrap_or_default()
    }

    #[inline(always)]
    fn blob_at(&self, offset: usize) -> &'a [u8] {
        let Some(len) = self.get_array::<4>(offset).map(u32::from_be_bytes) else {
            return &[];
        };
        let start = offset + 4;
        start
            .checked_add(len as usize)
            .and_then(|end| self.buffer.get(start..end))
            .unwrap_or_default()
    }

    // ---- checked reads ----

    pub fn read_int32_element(&self, index: usize) -> i32 {
        self.checked_offset(index, TypeTag::Int32)
            .and_then(|o| self.get_array(o))
            .map_or(0, i32::from_be_bytes)
    }

    pub fn read_float32_element(&self, index: usize) -> f32 {
        self.checked_offset(index, TypeTag::Float32)
            .and_then(|o| self.get_array(o))
            .map_or(0.0, f32::from_be_bytes)
    }

    /// Empty string when the element is missing, mistyped or not UTF-8
    pub fn read_string_element(&self, index: usize) -> &'a str {
        self.checked_offset(index, TypeTag::String)
            .map_or("", |o| self.str_at(o))
    }

    pub fn read_blob_element(&self, index: usize) -> &'a [u8] {
        self.checked_offset(index, TypeTag::Blob)
            .map(|o| self.blob_at(o))
            .unwrap_or_default()
    }

    pub fn read_int64_element(&self, index: usize) -> i64 {
        self.checked_offset(index, TypeTag::Int64)
            .and_then(|o| self.get_array(o))
            .map_or(0, i64::from_be_bytes)
    }

    pub fn read_float64_element(&self, index: usize) -> f64 {
        self.checked_offset(index, TypeTag::Float64)
            .and_then(|o| self.get_array(o))
            .map_or(0.0, f64::from_be_bytes)
    }

    pub fn read_timestamp_element(&self, index: usize) -> TimeTag {
        self.checked_offset(index, TypeTag::TimeTag)
            .and_then(|o| self.get_array(o))
            .map_or_else(TimeTag::default, |b| TimeTag::from_u64(u64::from_be_bytes(b)))
    }

    /// `'\0'` for missing elements and for code points that are not valid chars
    pub fn read_char_element(&self, index: usize) -> char {
        self.checked_offset(index, TypeTag::Char)
            .and_then(|o| self.get_array(o))
            .and_then(|b| char::from_u32(u32::from_be_bytes(b)))
            .unwrap_or_default()
    }

    pub fn read_color32_element(&self, index: usize) -> Color32 {
        self.checked_offset(index, TypeTag::Color32)
            .and_then(|o| self.get_array(o))
            .map_or_else(Color32::default, Color32::from_bytes)
    }

    pub fn read_midi_element(&self, index: usize) -> MidiMessage {
        self.checked_offset(index, TypeTag::Midi)
            .and_then(|o| self.get_array(o))
            .map_or_else(MidiMessage::default, MidiMessage::from_bytes)
    }

    /// Decoded from the tag itself: `T` is true, `F` and anything else false.
    pub fn read_bool_element(&self, index: usize) -> bool {
        match self.tags.get(index) {
            Some(&tag) => tag == TypeTag::True,
            None => {
                self.report_out_of_range(index);
                false
            }
        }
    }

    #[inline(always)]
    pub fn is_nil(&self, index: usize) -> bool {
        self.tag(index) == Some(TypeTag::Nil)
    }

    #[inline(always)]
    pub fn is_infinitum(&self, index: usize) -> bool {
        self.tag(index) == Some(TypeTag::Infinitum)
    }

    // ---- unchecked reads ----
    //
    // Panic when `index >= element_count()` or the slot is too short for the
    // requested type. A mistyped but long-enough slot yields reinterpreted bits.

    #[inline(always)]
    pub fn read_int32_element_unchecked(&self, index: usize) -> i32 {
        i32::from_be_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_float32_element_unchecked(&self, index: usize) -> f32 {
        f32::from_be_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_string_element_unchecked(&self, index: usize) -> &'a str {
        self.str_at(self.offsets[index])
    }

    #[inline(always)]
    pub fn read_blob_element_unchecked(&self, index: usize) -> &'a [u8] {
        self.blob_at(self.offsets[index])
    }

    #[inline(always)]
    pub fn read_int64_element_unchecked(&self, index: usize) -> i64 {
        i64::from_be_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_float64_element_unchecked(&self, index: usize) -> f64 {
        f64::from_be_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_timestamp_element_unchecked(&self, index: usize) -> TimeTag {
        TimeTag::from_u64(u64::from_be_bytes(self.array_at(self.offsets[index])))
    }

    #[inline(always)]
    pub fn read_char_element_unchecked(&self, index: usize) -> char {
        char::from_u32(u32::from_be_bytes(self.array_at(self.offsets[index]))).unwrap_or_default()
    }

    #[inline(always)]
    pub fn read_color32_element_unchecked(&self, index: usize) -> Color32 {
        Color32::from_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_midi_element_unchecked(&self, index: usize) -> MidiMessage {
        MidiMessage::from_bytes(self.array_at(self.offsets[index]))
    }

    #[inline(always)]
    pub fn read_bool_element_unchecked(&self, index: usize) -> bool {
        self.tags[index] == TypeTag::True
    }

    /// Generic read, dispatching on the element's own tag
    pub fn element(&self, index: usize) -> Option<Element<'a>> {
        let tag = self.tag(index)?;
        let element = match tag {
            TypeTag::Int32 => Element::Int32(self.read_int32_element(index)),
            TypeTag::Float32 => Element::Float32(self.read_float32_element(index)),
            TypeTag::String => Element::String(self.read_string_element(index)),
            TypeTag::Blob => Element::Blob(self.read_blob_element(index)),
            TypeTag::Int64 => Element::Int64(self.read_int64_element(index)),
            TypeTag::Float64 => Element::Float64(self.read_float64_element(index)),
            TypeTag::TimeTag => Element::TimeTag(self.read_timestamp_element(index)),
            TypeTag::Char => Element::Char(self.read_char_element(index)),
            TypeTag::Color32 => Element::Color32(self.read_color32_element(index)),
            TypeTag::Midi => Element::Midi(self.read_midi_element(index)),
            TypeTag::True => Element::Bool(true),
            TypeTag::False => Element::Bool(false),
            TypeTag::Nil => Element::Nil,
            TypeTag::Infinitum => Element::Infinitum,
        };
        Some(element)
    }

    /// All elements in order
    pub fn iter(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let values = *self;
        (0..values.element_count()).filter_map(move |i| values.element(i))
    }
}

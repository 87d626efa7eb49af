//! OSC type tags and their wire-size rules.

/// Alignment unit of every OSC field
pub const ALIGNMENT: usize = 4;

/// Round `len` up to the next multiple of four.
#[inline(always)]
pub const fn padded_len(len: usize) -> usize {
    (len + (ALIGNMENT - 1)) & !(ALIGNMENT - 1)
}

/// Element kind, encoded on the wire as a single ASCII character.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `i` - 32-bit big-endian two's complement integer
    Int32 = b'i',
    /// `f` - 32-bit big-endian IEEE 754 float
    Float32 = b'f',
    /// `s` - NUL-terminated string, padded to a multiple of 4
    String = b's',
    /// `b` - 32-bit length followed by that many bytes, padded
    Blob = b'b',
    /// `h` - 64-bit big-endian two's complement integer
    Int64 = b'h',
    /// `d` - 64-bit big-endian IEEE 754 float
    Float64 = b'd',
    /// `t` - NTP time tag, 32.32 fixed point
    TimeTag = b't',
    /// `c` - character sent as 32 bits
    Char = b'c',
    /// `r` - 32-bit RGBA color
    Color32 = b'r',
    /// `m` - 4-byte MIDI message: port id, status, data1, data2
    Midi = b'm',
    /// `T` - true, no payload
    True = b'T',
    /// `F` - false, no payload
    False = b'F',
    /// `N` - nil, no payload
    Nil = b'N',
    /// `I` - infinitum, no payload
    Infinitum = b'I',
}

impl TypeTag {
    #[inline(always)]
    pub fn from_byte(v: u8) -> Option<Self> {
        match v {
            b'i' => Some(Self::Int32),
            b'f' => Some(Self::Float32),
            b's' => Some(Self::String),
            b'b' => Some(Self::Blob),
            b'h' => Some(Self::Int64),
            b'd' => Some(Self::Float64),
            b't' => Some(Self::TimeTag),
            b'c' => Some(Self::Char),
            b'r' => Some(Self::Color32),
            b'm' => Some(Self::Midi),
            b'T' => Some(Self::True),
            b'F' => Some(Self::False),
            b'N' => Some(Self::Nil),
            b'I' => Some(Self::Infinitum),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    pub fn as_char(self) -> char {
        self as u8 as char
    }

    /// Payload size for fixed-width tags, `None` for strings and blobs.
    #[inline(always)]
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Int32 | Self::Float32 | Self::Char | Self::Color32 | Self::Midi => Some(4),
            Self::Int64 | Self::Float64 | Self::TimeTag => Some(8),
            Self::True | Self::False | Self::Nil | Self::Infinitum => Some(0),
            Self::String | Self::Blob => None,
        }
    }

    /// Whether the element carries bytes after the type-tag string.
    #[inline(always)]
    pub fn has_payload(self) -> bool {
        self.fixed_size() != Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TypeTag; 14] = [
        TypeTag::Int32,
        TypeTag::Float32,
        TypeTag::String,
        TypeTag::Blob,
        TypeTag::Int64,
        TypeTag::Float64,
        TypeTag::TimeTag,
        TypeTag::Char,
        TypeTag::Color32,
        TypeTag::Midi,
        TypeTag::True,
        TypeTag::False,
        TypeTag::Nil,
        TypeTag::Infinitum,
    ];

    #[test]
    fn test_byte_mapping() {
        for tag in ALL {
            assert_eq!(TypeTag::from_byte(tag.as_byte()), Some(tag));
        }
        assert_eq!(TypeTag::from_byte(b'x'), None);
        assert_eq!(TypeTag::from_byte(b','), None);
        assert_eq!(TypeTag::from_byte(0), None);
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(TypeTag::Int32.fixed_size(), Some(4));
        assert_eq!(TypeTag::Float64.fixed_size(), Some(8));
        assert_eq!(TypeTag::TimeTag.fixed_size(), Some(8));
        assert_eq!(TypeTag::String.fixed_size(), None);
        assert_eq!(TypeTag::Blob.fixed_size(), None);
        assert!(!TypeTag::Nil.has_payload());
        assert!(!TypeTag::True.has_payload());
        assert!(TypeTag::Blob.has_payload());
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 4);
        assert_eq!(padded_len(4), 4);
        assert_eq!(padded_len(5), 8);
        assert_eq!(padded_len(12), 12);
    }
}

//! Element values carried by an OSC message.
//!
//! `Element` is the single value type accepted by the writer and returned by
//! the generic reader. Strings and blobs borrow their bytes, so building an
//! outgoing message or reading a received one allocates nothing.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::type_tag::TypeTag;

/// 32-bit RGBA color, wire order r, g, b, a
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline(always)]
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

/// 4-byte MIDI message, wire order port id, status, data1, data2
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MidiMessage {
    pub port_id: u8,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiMessage {
    #[inline(always)]
    pub const fn new(port_id: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self { port_id, status, data1, data2 }
    }

    #[inline(always)]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.port_id, self.status, self.data1, self.data2]
    }

    #[inline(always)]
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

/// NTP time tag: seconds since 1900-01-01 and a 32-bit binary fraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeTag {
    pub seconds: u32,
    pub fraction: u32,
}

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

impl TimeTag {
    /// Special value meaning "immediately"
    pub const IMMEDIATE: TimeTag = TimeTag { seconds: 0, fraction: 1 };

    #[inline(always)]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    #[inline(always)]
    pub const fn from_u64(v: u64) -> Self {
        Self::new((v >> 32) as u32, v as u32)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Convert a wall-clock time. Times before 1970 clamp to the Unix epoch.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let seconds = since_unix.as_secs() + NTP_UNIX_OFFSET;
        let fraction = ((since_unix.subsec_nanos() as u64) << 32) / 1_000_000_000;
        Self::new(seconds as u32, fraction as u32)
    }
}

/// Two float32 components, sent as `ff`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Three float32 components, sent as `fff`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One OSC message element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    Int32(i32),
    Float32(f32),
    String(&'a str),
    Blob(&'a [u8]),
    Int64(i64),
    Float64(f64),
    TimeTag(TimeTag),
    Char(char),
    Color32(Color32),
    Midi(MidiMessage),
    Bool(bool),
    Nil,
    Infinitum,
}

impl Element<'_> {
    /// Type tag this element is written with
    #[inline(always)]
    pub fn tag(&self) -> TypeTag {
        match self {
            Element::Int32(_) => TypeTag::Int32,
            Element::Float32(_) => TypeTag::Float32,
            Element::String(_) => TypeTag::String,
            Element::Blob(_) => TypeTag::Blob,
            Element::Int64(_) => TypeTag::Int64,
            Element::Float64(_) => TypeTag::Float64,
            Element::TimeTag(_) => TypeTag::TimeTag,
            Element::Char(_) => TypeTag::Char,
            Element::Color32(_) => TypeTag::Color32,
            Element::Midi(_) => TypeTag::Midi,
            Element::Bool(true) => TypeTag::True,
            Element::Bool(false) => TypeTag::False,
            Element::Nil => TypeTag::Nil,
            Element::Infinitum => TypeTag::Infinitum,
        }
    }
}

impl From<i32> for Element<'_> {
    fn from(v: i32) -> Self {
        Element::Int32(v)
    }
}

impl From<f32> for Element<'_> {
    fn from(v: f32) -> Self {
        Element::Float32(v)
    }
}

impl<'a> From<&'a str> for Element<'a> {
    fn from(v: &'a str) -> Self {
        Element::String(v)
    }
}

impl<'a> From<&'a [u8]> for Element<'a> {
    fn from(v: &'a [u8]) -> Self {
        Element::Blob(v)
    }
}

impl From<i64> for Element<'_> {
    fn from(v: i64) -> Self {
        Element::Int64(v)
    }
}

impl From<f64> for Element<'_> {
    fn from(v: f64) -> Self {
        Element::Float64(v)
    }
}

impl From<TimeTag> for Element<'_> {
    fn from(v: TimeTag) -> Self {
        Element::TimeTag(v)
    }
}

impl From<char> for Element<'_> {
    fn from(v: char) -> Self {
        Element::Char(v)
    }
}

impl From<Color32> for Element<'_> {
    fn from(v: Color32) -> Self {
        Element::Color32(v)
    }
}

impl From<MidiMessage> for Element<'_> {
    fn from(v: MidiMessage) -> Self {
        Element::Midi(v)
    }
}

impl From<bool> for Element<'_> {
    fn from(v: bool) -> Self {
        Element::Bool(v)
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Int32(v) => write!(f, "{v}"),
            Element::Float32(v) => write!(f, "{v}"),
            Element::String(v) => write!(f, "{v:?}"),
            Element::Blob(v) => {
                write!(f, "<")?;
                for b in v.iter() {
                    write!(f, "{b:02x}")?;
                }
                write!(f, ">")
            }
            Element::Int64(v) => write!(f, "{v}"),
            Element::Float64(v) => write!(f, "{v}"),
            Element::TimeTag(t) => write!(f, "{}.{:08x}", t.seconds, t.fraction),
            Element::Char(c) => write!(f, "{c:?}"),
            Element::Color32(c) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            Element::Midi(m) => write!(
                f,
                "midi({} {:02x} {:02x} {:02x})",
                m.port_id, m.status, m.data1, m.data2
            ),
            Element::Bool(v) => write!(f, "{v}"),
            Element::Nil => write!(f, "nil"),
            Element::Infinitum => write!(f, "inf"),
        }
    }
}

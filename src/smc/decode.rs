//! Typed value decoder
//!
//! Interprets the raw bytes of a register read according to the declared
//! four-character type tag. Purely syntactic: this module knows nothing of
//! sensor semantics; per-sensor scaling conventions live in
//! [`crate::domain::sensor`].

use crate::error::SmcError;
use crate::smc::key::{four_cc, type_tag_of};
use crate::smc::wire::PAYLOAD_LEN;

/// Unsigned 8-bit integer
pub const TAG_UI8: u32 = four_cc(b"ui8 ");
/// Unsigned 16-bit integer, big-endian
pub const TAG_UI16: u32 = four_cc(b"ui16");
/// Unsigned 32-bit integer, big-endian
pub const TAG_UI32: u32 = four_cc(b"ui32");
/// Unsigned fixed-point with 2 fractional bits, big-endian
pub const TAG_FPE2: u32 = four_cc(b"fpe2");
/// IEEE-754 single precision, little-endian
pub const TAG_FLT: u32 = four_cc(b"flt ");

/// Raw bytes copied out of a transaction's fixed 32-byte payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue {
    bytes: [u8; PAYLOAD_LEN],
    len: usize,
}

impl RawValue {
    /// Copy `len` bytes out of a response payload (`len` capped at 32)
    pub fn from_payload(payload: &[u8; PAYLOAD_LEN], len: usize) -> Self {
        Self {
            bytes: *payload,
            len: len.min(PAYLOAD_LEN),
        }
    }

    /// Build a value from a short byte slice (test and write-path helper)
    pub fn from_slice(data: &[u8]) -> Self {
        let mut bytes = [0u8; PAYLOAD_LEN];
        let len = data.len().min(PAYLOAD_LEN);
        bytes[..len].copy_from_slice(&data[..len]);
        Self { bytes, len }
    }

    /// The meaningful bytes (declared size, not the full 32-byte buffer)
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A decoded register value, tagged with its wire encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    /// fpe2: raw big-endian 16-bit value divided by 4.0
    FixedPoint(f32),
    /// flt: little-endian IEEE-754 single precision
    Float(f32),
}

impl TypedValue {
    /// Decode raw bytes under the declared type tag
    ///
    /// The float tag is read little-endian, inverted relative to every other
    /// tag; that is how the controller stores it, not a choice made here.
    /// Unknown tags fall back on payload size: one byte decodes as ui8, two
    /// as big-endian ui16, anything else fails.
    pub fn decode(raw: &RawValue, data_type: u32) -> Result<Self, SmcError> {
        let bytes = raw.as_slice();

        let decoded = match data_type {
            TAG_UI8 => bytes.first().copied().map(TypedValue::UInt8),
            TAG_UI16 => be_u16(bytes).map(TypedValue::UInt16),
            TAG_UI32 => bytes
                .get(..4)
                .map(|b| TypedValue::UInt32(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))),
            TAG_FPE2 => be_u16(bytes).map(|v| TypedValue::FixedPoint(v as f32 / 4.0)),
            TAG_FLT => bytes
                .get(..4)
                .map(|b| TypedValue::Float(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))),
            _ => match bytes.len() {
                1 => Some(TypedValue::UInt8(bytes[0])),
                2 => be_u16(bytes).map(TypedValue::UInt16),
                _ => None,
            },
        };

        decoded.ok_or_else(|| SmcError::DecodeFailed {
            tag: type_tag_of(data_type),
            len: raw.len(),
        })
    }

    /// The decoded value as a plain number
    pub fn as_f64(&self) -> f64 {
        match *self {
            TypedValue::UInt8(v) => v as f64,
            TypedValue::UInt16(v) => v as f64,
            TypedValue::UInt32(v) => v as f64,
            TypedValue::FixedPoint(v) => v as f64,
            TypedValue::Float(v) => v as f64,
        }
    }
}

fn be_u16(bytes: &[u8]) -> Option<u16> {
    bytes.get(..2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

//! SMC key codec
//!
//! SMC registers are addressed by four-character ASCII names ("FNum",
//! "F0Ac", ...) packed big-endian into a 32-bit code: byte 0 of the name is
//! the most significant byte of the code. Names shorter than four bytes are
//! zero-padded at the low end. The same packing is used for the
//! four-character type tags the controller returns in key metadata.

use crate::error::DomainError;
use std::fmt;

/// A register key: a 1-4 character ASCII name and its derived 32-bit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmcKey(u32);

impl SmcKey {
    /// Create a key from its ASCII name with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidKey` if the name is empty, longer than
    /// four bytes, or contains non-ASCII characters. Rejecting overlong
    /// names (rather than truncating) keeps a typo from silently addressing
    /// a different register.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !name.is_ascii() {
            return Err(DomainError::InvalidKey(name.to_string()));
        }

        let mut code: u32 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            code |= (b as u32) << (24 - 8 * i);
        }
        Ok(Self(code))
    }

    /// Create a key from an already-packed 32-bit code
    pub const fn from_code(code: u32) -> Self {
        Self(code)
    }

    /// Get the packed 32-bit code (byte 0 of the name is most significant)
    #[inline]
    pub const fn code(&self) -> u32 {
        self.0
    }

    /// Recover the ASCII name, dropping low-end zero padding
    pub fn name(&self) -> String {
        let mut name = String::with_capacity(4);
        for shift in [24u32, 16, 8, 0] {
            let b = ((self.0 >> shift) & 0xFF) as u8;
            if b == 0 {
                break;
            }
            name.push(b as char);
        }
        name
    }
}

impl fmt::Display for SmcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pack a four-byte tag into its 32-bit wire form
///
/// Used for the type-tag constants the decoder dispatches on ("ui8 ",
/// "fpe2", "flt ", ...). Tags are always exactly four bytes, space-padded.
pub const fn four_cc(tag: &[u8; 4]) -> u32 {
    ((tag[0] as u32) << 24) | ((tag[1] as u32) << 16) | ((tag[2] as u32) << 8) | (tag[3] as u32)
}

/// Reinterpret a returned 32-bit type code as its four-character ASCII tag
///
/// Non-printable bytes are mapped to '.' so the result is always loggable.
/// General decode-to-name beyond this is not needed; the tag string only
/// feeds decoder dispatch and diagnostics.
pub fn type_tag_of(code: u32) -> String {
    let mut tag = String::with_capacity(4);
    for shift in [24u32, 16, 8, 0] {
        let b = ((code >> shift) & 0xFF) as u8;
        if b.is_ascii_graphic() || b == b' ' {
            tag.push(b as char);
        } else {
            tag.push('.');
        }
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_keys() {
        // "FNum" = 0x464E756D
        assert_eq!(SmcKey::new("FNum").unwrap().code(), 0x464E_756D);
        assert_eq!(SmcKey::new("F0Ac").unwrap().code(), 0x4630_4163);
    }

    #[test]
    fn test_short_name_packs_high_bytes() {
        let key = SmcKey::new("ab").unwrap();
        assert_eq!(key.code(), 0x6162_0000);
    }

    #[test]
    fn test_round_trip_1_to_4_chars() {
        for name in ["F", "F0", "TG0", "TG0P", "#KEY", "z!9 "] {
            let key = SmcKey::new(name).unwrap();
            assert_eq!(key.name(), name, "round trip failed for '{name}'");
        }
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(SmcKey::new("").is_err());
        assert!(SmcKey::new("TOOLONG").is_err());
        assert!(SmcKey::new("ké y").is_err());
    }

    #[test]
    fn test_four_cc_matches_encode() {
        assert_eq!(four_cc(b"FNum"), SmcKey::new("FNum").unwrap().code());
        assert_eq!(four_cc(b"ui8 "), 0x7569_3820);
    }

    #[test]
    fn test_type_tag_of() {
        assert_eq!(type_tag_of(four_cc(b"fpe2")), "fpe2");
        assert_eq!(type_tag_of(four_cc(b"flt ")), "flt ");
        // Non-printable bytes render as dots
        assert_eq!(type_tag_of(0x0001_6220), "..b ");
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(SmcKey::new("F0Tg").unwrap().to_string(), "F0Tg");
    }
}

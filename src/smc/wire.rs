//! SMC register transaction block
//!
//! The controller speaks a single fixed-size parameter block in both
//! directions. The layout below is the controller's native ABI and must stay
//! bit-exact: `#[repr(C)]` reproduces the kernel's C layout, including the
//! two bytes of tail padding after the 9 meaningful key-info bytes. The
//! version and power-limit sub-structures are unused by this crate and
//! travel zero-filled.

use crate::smc::key::type_tag_of;

/// Operation code: fetch a key's metadata (size, type tag, attributes)
pub const OP_READ_KEY_INFO: u8 = 9;
/// Operation code: read a key's raw bytes
pub const OP_READ_BYTES: u8 = 5;
/// Operation code: write raw bytes to a key
pub const OP_WRITE_BYTES: u8 = 6;

/// IOKit struct-method selector for SMC event handling
pub const SMC_SELECTOR_HANDLE_EVENT: u32 = 2;

/// Maximum payload carried by one transaction
pub const PAYLOAD_LEN: usize = 32;

/// Firmware version sub-structure (unused, zero-filled)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SmcVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: u8,
    pub release: u16,
}

/// Power-limit sub-structure (unused, zero-filled)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SmcPLimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_p_limit: u32,
    pub gpu_p_limit: u32,
    pub mem_p_limit: u32,
}

/// Key metadata as returned by a get-key-info transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SmcKeyInfo {
    /// Declared value size in bytes (0..=32)
    pub data_size: u32,
    /// Packed four-character type tag
    pub data_type: u32,
    /// Attribute flags byte
    pub data_attributes: u8,
}

impl SmcKeyInfo {
    /// The type tag as a four-character ASCII string for decoder dispatch
    pub fn tag(&self) -> String {
        type_tag_of(self.data_type)
    }
}

/// The full transaction block sent to and received from the controller
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct SmcParam {
    pub key: u32,
    pub vers: SmcVersion,
    pub p_limit: SmcPLimitData,
    pub key_info: SmcKeyInfo,
    pub result: u8,
    pub status: u8,
    /// Operation code (one of the `OP_*` constants)
    pub data8: u8,
    pub data32: u32,
    /// Fixed 32-byte data payload
    pub bytes: [u8; PAYLOAD_LEN],
}

impl SmcParam {
    /// Build a get-key-info request for `key`
    pub fn read_key_info(key: u32) -> Self {
        Self {
            key,
            data8: OP_READ_KEY_INFO,
            ..Self::default()
        }
    }

    /// Build a read-bytes request for `key` with the declared value size
    pub fn read_bytes(key: u32, key_info: SmcKeyInfo) -> Self {
        Self {
            key,
            key_info,
            data8: OP_READ_BYTES,
            ..Self::default()
        }
    }

    /// Build a write-bytes request for `key`
    ///
    /// Copies at most [`PAYLOAD_LEN`] bytes into the payload and returns the
    /// number actually copied; the caller decides how to report a short copy.
    pub fn write_bytes(key: u32, payload: &[u8]) -> (Self, usize) {
        let copied = payload.len().min(PAYLOAD_LEN);
        let mut param = Self {
            key,
            data8: OP_WRITE_BYTES,
            ..Self::default()
        };
        param.key_info.data_size = copied as u32;
        param.bytes[..copied].copy_from_slice(&payload[..copied]);
        (param, copied)
    }
}

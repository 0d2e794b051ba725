//! SMC abstraction layer
//!
//! Key codec, wire format, control channel, register protocol, and typed
//! value decoding, with trait-based transports for testability.

pub mod channel;
pub mod client;
pub mod decode;
pub mod iokit;
pub mod key;
pub mod traits;
pub mod wire;

pub use channel::SmcChannel;
pub use client::{SmcClient, FAN_COUNT_KEY};
pub use decode::{RawValue, TypedValue};
pub use iokit::IoKitConnector;
pub use key::SmcKey;
pub use traits::{SmcConnector, SmcTransport};
pub use wire::{SmcKeyInfo, SmcParam};

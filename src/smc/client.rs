//! SMC register protocol
//!
//! The read and write call sequences on top of the control channel. A read
//! is two chained transactions (get-key-info, then read-bytes for the
//! declared size); a write is a single write-bytes transaction. The call
//! sequences live here once; fans, sensors and the helper daemon are all
//! thin callers.
//!
//! The public `read*`/`write*` surface absorbs all failures into
//! `Option`/`bool`: the controller may legitimately be absent, individual
//! keys may not exist on a given hardware generation, and callers commonly
//! chain fallback keys where the first success wins.

use crate::error::SmcError;
use crate::smc::channel::SmcChannel;
use crate::smc::decode::{RawValue, TypedValue};
use crate::smc::key::SmcKey;
use crate::smc::traits::SmcConnector;
use crate::smc::wire::{SmcKeyInfo, SmcParam};

/// Register key holding the fan count (1 byte, unsigned)
pub const FAN_COUNT_KEY: &str = "FNum";

/// Register protocol client owning one control channel
pub struct SmcClient<C: SmcConnector> {
    channel: SmcChannel<C>,
}

impl<C: SmcConnector> SmcClient<C> {
    /// Create a client; the session opens lazily on first register access
    pub fn new(connector: C) -> Self {
        Self {
            channel: SmcChannel::new(connector),
        }
    }

    /// Open the underlying session (idempotent); see [`SmcChannel::open`]
    pub fn open(&self) -> bool {
        self.channel.open()
    }

    /// Close the underlying session
    pub fn close(&self) {
        self.channel.close()
    }

    /// Fetch a key's declared size, type tag and attributes
    pub fn key_info(&self, key: SmcKey) -> Result<SmcKeyInfo, SmcError> {
        let output = self.channel.transact(&SmcParam::read_key_info(key.code()))?;
        Ok(output.key_info)
    }

    /// Two-phase read: key info, then exactly `data_size` raw bytes
    pub fn read_raw(&self, key: SmcKey) -> Result<(SmcKeyInfo, RawValue), SmcError> {
        let info = self.key_info(key)?;
        let output = self
            .channel
            .transact(&SmcParam::read_bytes(key.code(), info))?;
        let raw = RawValue::from_payload(&output.bytes, info.data_size as usize);
        Ok((info, raw))
    }

    /// Read a register and decode it under its declared type tag
    ///
    /// Degrades to `None` on any failure: bad key name, unavailable
    /// service, failed transaction, or undecodable value.
    pub fn read(&self, name: &str) -> Option<f64> {
        if !self.open() {
            return None;
        }
        let key = self.parse_key(name)?;

        match self
            .read_raw(key)
            .and_then(|(info, raw)| TypedValue::decode(&raw, info.data_type))
        {
            Ok(value) => Some(value.as_f64()),
            Err(err) => {
                log::debug!("Read of '{name}' yielded no value: {err}");
                None
            }
        }
    }

    /// Read a register's raw bytes without decoding
    pub fn read_bytes(&self, name: &str) -> Option<RawValue> {
        if !self.open() {
            return None;
        }
        let key = self.parse_key(name)?;

        match self.read_raw(key) {
            Ok((_, raw)) => Some(raw),
            Err(err) => {
                log::debug!("Raw read of '{name}' yielded no value: {err}");
                None
            }
        }
    }

    /// Try each candidate key in order; first successful read wins
    pub fn read_any(&self, names: &[&str]) -> Option<f64> {
        names.iter().find_map(|name| self.read(name))
    }

    /// Write raw bytes to a register
    ///
    /// Payloads beyond 32 bytes are truncated, matching the controller's
    /// fixed buffer; the truncation is logged rather than silent. Success
    /// is the transaction status only; there is no verification read-back.
    pub fn write(&self, name: &str, payload: &[u8]) -> bool {
        if !self.open() {
            return false;
        }
        let Some(key) = self.parse_key(name) else {
            return false;
        };

        let (param, copied) = SmcParam::write_bytes(key.code(), payload);
        if copied < payload.len() {
            log::warn!(
                "Write to '{name}' truncated: {} of {} bytes dropped",
                payload.len() - copied,
                payload.len()
            );
        }

        match self.channel.transact(&param) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("Write to '{name}' failed: {err}");
                false
            }
        }
    }

    /// Read the fan-count register; 0 when unavailable
    pub fn fan_count(&self) -> usize {
        self.read(FAN_COUNT_KEY).map(|v| v as usize).unwrap_or(0)
    }

    /// Force a fan to manual control and set its target speed
    ///
    /// Two sequential writes: 1 byte `1` to the fan's mode key, then the
    /// target RPM as little-endian IEEE-754 single precision to the target
    /// key. Both are fire-and-forget; a failed mode write does not abort
    /// the target write, and overall success is the target write's status
    /// alone.
    pub fn set_fan_speed(&self, index: usize, rpm: f64) -> bool {
        let mode_key = crate::domain::fan::mode_key(index);
        if !self.write(&mode_key, &[1]) {
            log::warn!("Manual-mode write to '{mode_key}' failed; attempting target write anyway");
        }

        let target_bytes = (rpm as f32).to_le_bytes();
        let target_key = crate::domain::fan::target_key(index);
        let ok = self.write(&target_key, &target_bytes);
        log::debug!("Target write '{target_key}' = {rpm} RPM: {ok}");
        ok
    }

    fn parse_key(&self, name: &str) -> Option<SmcKey> {
        match SmcKey::new(name) {
            Ok(key) => Some(key),
            Err(err) => {
                log::debug!("{err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnector;
    use crate::smc::wire::{OP_READ_BYTES, OP_READ_KEY_INFO, OP_WRITE_BYTES, PAYLOAD_LEN};

    fn fan_client() -> (MockConnector, SmcClient<MockConnector>) {
        let connector = MockConnector::new()
            .with_register(FAN_COUNT_KEY, b"ui8 ", &[2])
            .with_register("F0Ac", b"fpe2", &[0x1E, 0x00])
            .with_register("F0Md", b"ui8 ", &[0])
            .with_register("F0Tg", b"flt ", &[0, 0, 0, 0]);
        let client = SmcClient::new(connector.clone());
        (connector, client)
    }

    #[test]
    fn test_two_phase_read() {
        let (connector, client) = fan_client();

        assert_eq!(client.read("F0Ac"), Some(1920.0));

        let ops: Vec<u8> = connector.transactions().iter().map(|t| t.op).collect();
        assert_eq!(ops, vec![OP_READ_KEY_INFO, OP_READ_BYTES]);
    }

    #[test]
    fn test_read_unknown_key_degrades_to_none() {
        let (_, client) = fan_client();
        assert_eq!(client.read("Zzz9"), None);
        assert_eq!(client.read("NOT-A-KEY"), None);
    }

    #[test]
    fn test_read_without_service_degrades_to_none() {
        let client = SmcClient::new(MockConnector::new().with_connect_failure());
        assert_eq!(client.read("F0Ac"), None);
        assert!(!client.write("F0Md", &[1]));
    }

    #[test]
    fn test_read_any_first_success_wins() {
        let connector = MockConnector::new().with_register("TG0D", b"fpe2", &[0x00, 0xA0]);
        let client = SmcClient::new(connector);
        assert_eq!(client.read_any(&["TG0P", "TG0D", "Tg0P"]), Some(40.0));
    }

    #[test]
    fn test_fan_count() {
        let (_, client) = fan_client();
        assert_eq!(client.fan_count(), 2);

        let empty = SmcClient::new(MockConnector::new());
        assert_eq!(empty.fan_count(), 0);
    }

    #[test]
    fn test_write_records_payload() {
        let (connector, client) = fan_client();
        assert!(client.write("F0Md", &[1]));

        let writes: Vec<_> = connector
            .transactions()
            .into_iter()
            .filter(|t| t.op == OP_WRITE_BYTES)
            .collect();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].key, "F0Md");
        assert_eq!(writes[0].payload, vec![1]);
    }

    #[test]
    fn test_write_truncates_oversized_payload() {
        let (connector, client) = fan_client();
        assert!(client.write("F0Tg", &[0x55; 40]));

        let write = connector
            .transactions()
            .into_iter()
            .find(|t| t.op == OP_WRITE_BYTES)
            .unwrap();
        assert_eq!(write.payload.len(), PAYLOAD_LEN);
    }

    #[test]
    fn test_fan_speed_write_ordering() {
        let (connector, client) = fan_client();
        assert!(client.set_fan_speed(0, 4000.0));

        let writes: Vec<_> = connector
            .transactions()
            .into_iter()
            .filter(|t| t.op == OP_WRITE_BYTES)
            .collect();
        // Mode write strictly before target write
        assert_eq!(writes[0].key, "F0Md");
        assert_eq!(writes[0].payload, vec![1]);
        assert_eq!(writes[1].key, "F0Tg");
        assert_eq!(writes[1].payload, 4000.0f32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_fan_speed_mode_failure_does_not_abort_target() {
        let (connector, client) = {
            let connector = MockConnector::new()
                .with_register("F0Md", b"ui8 ", &[0])
                .with_register("F0Tg", b"flt ", &[0, 0, 0, 0])
                .with_write_failure("F0Md");
            (connector.clone(), SmcClient::new(connector))
        };

        // Overall success reflects only the target write's status
        assert!(client.set_fan_speed(0, 3000.0));

        let keys: Vec<_> = connector
            .transactions()
            .into_iter()
            .filter(|t| t.op == OP_WRITE_BYTES)
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["F0Md", "F0Tg"]);
    }

    #[test]
    fn test_fan_speed_target_failure_reported() {
        let connector = MockConnector::new()
            .with_register("F0Md", b"ui8 ", &[0])
            .with_register("F0Tg", b"flt ", &[0, 0, 0, 0])
            .with_write_failure("F0Tg");
        let client = SmcClient::new(connector);

        assert!(!client.set_fan_speed(0, 3000.0));
    }
}

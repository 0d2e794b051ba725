//! Sensor readout service
//!
//! Walks each sensor's fallback key chain (first successful read wins) and
//! applies the sensor's declared scaling convention on top of the typed
//! decoder.

use crate::domain::sensor::{builtin, Scaling, SensorReading, SensorSpec};
use crate::smc::{SmcClient, SmcConnector};
use std::sync::Arc;

/// Service resolving sensor specs against the controller
pub struct SensorService<C: SmcConnector> {
    smc: Arc<SmcClient<C>>,
}

impl<C: SmcConnector> SensorService<C> {
    pub fn new(smc: Arc<SmcClient<C>>) -> Self {
        Self { smc }
    }

    /// Resolve one sensor; `None` if no candidate key answered
    pub fn read(&self, spec: &SensorSpec) -> Option<SensorReading> {
        spec.candidates.iter().find_map(|key| {
            self.read_scaled(key, spec.scaling).map(|value| SensorReading {
                label: spec.label.to_string(),
                key: key.to_string(),
                value,
                unit: spec.unit.to_string(),
            })
        })
    }

    /// Resolve every built-in sensor that answers
    pub fn read_all(&self) -> Vec<SensorReading> {
        builtin().iter().filter_map(|spec| self.read(spec)).collect()
    }

    fn read_scaled(&self, key: &str, scaling: Scaling) -> Option<f64> {
        match scaling {
            Scaling::Typed => self.smc.read(key),
            Scaling::Centi => self.smc.read(key).map(|v| v / 100.0),
            Scaling::FixedQ8_8 => {
                // Raw 8.8 fixed point regardless of the declared tag
                let raw = self.smc.read_bytes(key)?;
                let bytes = raw.as_slice();
                if bytes.len() < 2 {
                    return None;
                }
                Some((bytes[0] as u16 as f64 * 256.0 + bytes[1] as f64) / 256.0)
            }
        }
    }
}

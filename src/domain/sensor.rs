//! Sensor specifications
//!
//! Each sensor names a chain of fallback register keys (different hardware
//! generations expose different keys; the first successful read wins) and
//! the scaling convention layered on top of the typed decoder.
//!
//! The scaling conventions are deliberately not unified: some keys go
//! through the typed decoder as-is, some are read as a raw 8.8 fixed-point
//! quantity regardless of the declared tag, and some report centi-units.
//! Which convention applies is a property of the key, so it is declared per
//! sensor here rather than guessed in the decoder.

use serde::Serialize;

/// Per-key scaling convention applied on top of the typed decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    /// Trust the typed decoder's result unchanged
    Typed,
    /// First two raw bytes as big-endian 8.8 fixed point (value / 256),
    /// ignoring the declared tag
    FixedQ8_8,
    /// Typed decoder's result divided by 100 (centi-units)
    Centi,
}

/// A sensor: label, fallback key chain, scaling convention, display unit
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SensorSpec {
    pub label: &'static str,
    pub candidates: &'static [&'static str],
    pub scaling: Scaling,
    pub unit: &'static str,
}

/// GPU temperature: proximity sensor first, then die, then the
/// lowercase variants some generations use
pub const GPU_TEMPERATURE: SensorSpec = SensorSpec {
    label: "GPU temperature",
    candidates: &["TG0P", "TG0D", "Tg0P", "Tg0D"],
    scaling: Scaling::FixedQ8_8,
    unit: "°C",
};

/// GPU power draw
pub const GPU_POWER: SensorSpec = SensorSpec {
    label: "GPU power",
    candidates: &["PCPG", "Pg0C", "PHPC"],
    scaling: Scaling::FixedQ8_8,
    unit: "W",
};

/// Battery temperature, reported in centi-Celsius
pub const BATTERY_TEMPERATURE: SensorSpec = SensorSpec {
    label: "Battery temperature",
    candidates: &["TB0T"],
    scaling: Scaling::Centi,
    unit: "°C",
};

/// The built-in sensor set, in display order
pub fn builtin() -> &'static [SensorSpec] {
    &[GPU_TEMPERATURE, GPU_POWER, BATTERY_TEMPERATURE]
}

/// One resolved sensor value
#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub label: String,
    /// The candidate key that answered
    pub key: String,
    pub value: f64,
    pub unit: String,
}

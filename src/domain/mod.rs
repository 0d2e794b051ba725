//! Domain models for smcctl
//!
//! Fan and sensor types with their invariants enforced on construction.

pub mod fan;
pub mod sensor;

pub use fan::Fan;
pub use sensor::{Scaling, SensorReading, SensorSpec};

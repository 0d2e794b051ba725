//! Service layer for SMC operations
//!
//! Services encapsulate the business logic for fan enumeration/control and
//! sensor readout on top of the register protocol.

pub mod fan_service;
pub mod sensor_service;

pub use fan_service::FanService;
pub use sensor_service::SensorService;

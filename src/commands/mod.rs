//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod daemon;
pub mod fan;
pub mod helper;
pub mod read;
pub mod sensors;

pub use daemon::run_daemon;
pub use fan::{run_fan, run_fans};
pub use helper::run_helper;
pub use read::run_read;
pub use sensors::run_sensors;

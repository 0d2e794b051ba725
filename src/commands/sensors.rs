//! Sensors command implementation
//!
//! Prints every built-in sensor that answers on this machine.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, SensorList};
use crate::error::Result;
use crate::services::SensorService;
use crate::smc::{IoKitConnector, SmcClient};
use std::sync::Arc;

/// Execute the sensors command
pub fn run_sensors(format: OutputFormat) -> Result<()> {
    let service = SensorService::new(Arc::new(SmcClient::new(IoKitConnector::new())));
    let sensors = service.read_all();
    print_output(&SensorList { sensors }, format)?;
    Ok(())
}

//! Privileged helper daemon
//!
//! Long-running root process owning its own SMC session and exposing
//! exactly the write operation (plus a version probe) on the system bus.
//! Reads never need elevation, so nothing else crosses this boundary.

use crate::error::Result;
use crate::helper::{HELPER_OBJECT_PATH, HELPER_SERVICE_NAME, HELPER_VERSION};
use crate::smc::{IoKitConnector, SmcClient};
use std::time::Duration;
use zbus::blocking::ConnectionBuilder;
use zbus::dbus_interface;

/// The daemon-side service object
pub struct HelperDaemon {
    smc: SmcClient<IoKitConnector>,
}

impl HelperDaemon {
    /// Create the daemon with its own control session
    pub fn new() -> Self {
        Self {
            smc: SmcClient::new(IoKitConnector::new()),
        }
    }
}

impl Default for HelperDaemon {
    fn default() -> Self {
        Self::new()
    }
}

#[dbus_interface(name = "io.smcctl.Helper1")]
impl HelperDaemon {
    /// Force manual mode and write the target speed for one fan
    ///
    /// Returns the target write's status; see
    /// [`crate::smc::SmcClient::set_fan_speed`] for the exact sequence.
    fn set_fan_speed(&self, index: u32, rpm: f64) -> bool {
        log::info!("Write request: fan {index} -> {rpm} RPM");
        let ok = self.smc.set_fan_speed(index as usize, rpm);
        log::info!("Write request for fan {index}: {}", if ok { "ok" } else { "failed" });
        ok
    }

    /// The daemon's version string
    fn get_version(&self) -> String {
        HELPER_VERSION.to_string()
    }
}

/// Claim the well-known name and serve until killed
pub fn run() -> Result<()> {
    log::info!("Starting privileged helper daemon v{HELPER_VERSION}");
    // Known gap: callers are identified by bus transport only; no
    // payload-level authentication is performed.
    log::warn!("Caller identity relies on the bus transport alone");

    let daemon = HelperDaemon::new();
    let _connection = ConnectionBuilder::system()
        .map_err(crate::error::HelperError::Bus)?
        .name(HELPER_SERVICE_NAME)
        .map_err(crate::error::HelperError::Bus)?
        .serve_at(HELPER_OBJECT_PATH, daemon)
        .map_err(crate::error::HelperError::Bus)?
        .build()
        .map_err(crate::error::HelperError::Bus)?;

    log::info!("Helper listening as {HELPER_SERVICE_NAME}");

    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_crate() {
        let daemon = HelperDaemon::new();
        assert_eq!(daemon.get_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    #[ignore = "Requires a system bus and root privileges"]
    fn test_daemon_claims_name() {
        run().unwrap();
    }
}

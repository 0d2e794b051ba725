//! Privilege separation layer
//!
//! Unprivileged processes cannot write SMC registers; writes go through a
//! continuously running, elevated helper daemon reached over the system
//! bus. This module holds both roles: the client-side proxy
//! ([`HelperClient`]) and the daemon ([`daemon`]), each owning its own
//! independent SMC session.

pub mod daemon;
pub mod proxy;

pub use daemon::HelperDaemon;
pub use proxy::{HelperClient, HelperConnector, HelperTransport, SystemBusConnector};

/// Well-known bus name the daemon claims
pub const HELPER_SERVICE_NAME: &str = "io.smcctl.Helper";
/// Object path the helper interface is served at
pub const HELPER_OBJECT_PATH: &str = "/io/smcctl/Helper";
/// Version string reported by `GetVersion`
pub const HELPER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The seam between fan control and the privileged write path
///
/// Implemented by [`HelperClient`] (remote write via the daemon), by
/// [`crate::smc::SmcClient`] (direct write, used inside the daemon and by
/// root-run invocations), and by the test stub in [`crate::mock`].
pub trait FanSpeedWriter {
    /// Request a fan speed change; resolves to the write's success
    fn set_fan_speed(&self, index: usize, rpm: f64) -> bool;
}

impl<C: crate::smc::SmcConnector> FanSpeedWriter for crate::smc::SmcClient<C> {
    fn set_fan_speed(&self, index: usize, rpm: f64) -> bool {
        crate::smc::SmcClient::set_fan_speed(self, index, rpm)
    }
}

//! Client-side proxy to the privileged helper daemon
//!
//! The connection is created lazily on first use and cached. Any bus error
//! nulls the cache, so the next call transparently re-establishes the
//! connection; callers never see an explicit reconnect step. All failures
//! resolve to `false`/`Err` without detail, per the write path's contract.
//!
//! The bus itself sits behind the [`HelperConnector`]/[`HelperTransport`]
//! trait pair, the same seam shape the SMC layer uses, so the reconnect
//! behavior is exercised against a scripted transport in tests.

use crate::error::HelperError;
use crate::helper::FanSpeedWriter;
use std::sync::Mutex;
use zbus::blocking::Connection;
use zbus::dbus_proxy;

#[dbus_proxy(
    interface = "io.smcctl.Helper1",
    default_service = "io.smcctl.Helper",
    default_path = "/io/smcctl/Helper"
)]
trait Helper {
    /// Perform the privileged fan speed write
    fn set_fan_speed(&self, index: u32, rpm: f64) -> zbus::Result<bool>;

    /// Report the daemon's version string
    fn get_version(&self) -> zbus::Result<String>;
}

/// Opens connections to the bus the daemon listens on
pub trait HelperConnector {
    /// The transport type produced by this connector
    type Transport: HelperTransport;

    /// Establish a connection to the daemon's bus
    fn connect(&self) -> Result<Self::Transport, HelperError>;
}

/// One established connection carrying the daemon's two methods
pub trait HelperTransport {
    fn set_fan_speed(&self, index: u32, rpm: f64) -> Result<bool, HelperError>;

    fn get_version(&self) -> Result<String, HelperError>;
}

/// Connector for the real system bus
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBusConnector;

impl HelperConnector for SystemBusConnector {
    type Transport = SystemBusTransport;

    fn connect(&self) -> Result<SystemBusTransport, HelperError> {
        Ok(SystemBusTransport {
            connection: Connection::system()?,
        })
    }
}

/// System-bus connection invoking the daemon through the generated proxy
pub struct SystemBusTransport {
    connection: Connection,
}

impl HelperTransport for SystemBusTransport {
    fn set_fan_speed(&self, index: u32, rpm: f64) -> Result<bool, HelperError> {
        Ok(HelperProxyBlocking::new(&self.connection)?.set_fan_speed(index, rpm)?)
    }

    fn get_version(&self) -> Result<String, HelperError> {
        Ok(HelperProxyBlocking::new(&self.connection)?.get_version()?)
    }
}

/// Lazily connected, auto-reconnecting handle to the helper daemon
pub struct HelperClient<B: HelperConnector = SystemBusConnector> {
    connector: B,
    connection: Mutex<Option<B::Transport>>,
}

impl HelperClient {
    /// A client for the real system bus
    pub fn new() -> Self {
        Self::with_connector(SystemBusConnector)
    }
}

impl Default for HelperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: HelperConnector> HelperClient<B> {
    /// A client over the given bus connector
    pub fn with_connector(connector: B) -> Self {
        Self {
            connector,
            connection: Mutex::new(None),
        }
    }

    /// Request a fan speed change through the daemon
    ///
    /// Sequence: best-effort reachability check (non-fatal), obtain or
    /// lazily create the bus connection, invoke the remote write, resolve
    /// the remote result. Any connection or proxy failure resolves to
    /// false. Requests are created per user action, never queued or
    /// retried here.
    pub fn request_fan_speed(&self, index: usize, rpm: f64) -> bool {
        self.ensure_running();

        match self.call(|transport| transport.set_fan_speed(index as u32, rpm)) {
            Ok(accepted) => {
                if !accepted {
                    log::warn!("Helper rejected fan {index} speed write ({rpm} RPM)");
                }
                accepted
            }
            Err(err) => {
                log::warn!("Helper write for fan {index} failed: {err}");
                false
            }
        }
    }

    /// The daemon's version string
    pub fn version(&self) -> Result<String, HelperError> {
        self.call(|transport| transport.get_version())
    }

    /// Best-effort check that the daemon is installed and answering
    ///
    /// Registration and launch of the root unit are deployment concerns;
    /// this only pings an uncached daemon and logs the outcome. Never
    /// fatal.
    pub fn ensure_running(&self) {
        if self.connection.lock().unwrap().is_some() {
            return;
        }
        match self.version() {
            Ok(version) => log::debug!("Helper daemon v{version} reachable"),
            Err(err) => log::debug!("Helper daemon not reachable yet: {err}"),
        }
    }

    /// Whether a bus connection is currently cached
    pub fn is_connected(&self) -> bool {
        self.connection.lock().unwrap().is_some()
    }

    /// Drop the cached connection; the next call re-establishes it
    ///
    /// Also happens internally on every transport error.
    pub fn invalidate(&self) {
        if self.connection.lock().unwrap().take().is_some() {
            log::debug!("Helper connection invalidated");
        }
    }

    fn call<T>(
        &self,
        invoke: impl FnOnce(&B::Transport) -> Result<T, HelperError>,
    ) -> Result<T, HelperError> {
        let mut cached = self.connection.lock().unwrap();
        if cached.is_none() {
            log::debug!("Creating helper bus connection");
            *cached = Some(self.connector.connect()?);
        }

        let transport = cached.as_ref().ok_or(HelperError::ConnectionLost)?;
        invoke(transport).map_err(|err| {
            // Interruption or invalidation: null the cache so the next
            // call reconnects transparently.
            cached.take();
            log::debug!("Helper connection invalidated");
            err
        })
    }
}

impl<B: HelperConnector> FanSpeedWriter for HelperClient<B> {
    fn set_fan_speed(&self, index: usize, rpm: f64) -> bool {
        self.request_fan_speed(index, rpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Default)]
    struct ScriptedState {
        connects: Mutex<usize>,
        drop_next_write: Mutex<bool>,
        writes: Mutex<Vec<(u32, f64)>>,
    }

    /// Bus stand-in: connections always open; one write can be scripted to
    /// fail as if the connection died mid-call.
    #[derive(Clone, Default)]
    struct ScriptedConnector {
        state: Arc<ScriptedState>,
    }

    impl ScriptedConnector {
        fn drop_next_write(&self) {
            *self.state.drop_next_write.lock().unwrap() = true;
        }

        fn connects(&self) -> usize {
            *self.state.connects.lock().unwrap()
        }

        fn writes(&self) -> Vec<(u32, f64)> {
            self.state.writes.lock().unwrap().clone()
        }
    }

    impl HelperConnector for ScriptedConnector {
        type Transport = ScriptedTransport;

        fn connect(&self) -> Result<ScriptedTransport, HelperError> {
            *self.state.connects.lock().unwrap() += 1;
            Ok(ScriptedTransport {
                state: Arc::clone(&self.state),
            })
        }
    }

    struct ScriptedTransport {
        state: Arc<ScriptedState>,
    }

    impl HelperTransport for ScriptedTransport {
        fn set_fan_speed(&self, index: u32, rpm: f64) -> Result<bool, HelperError> {
            if std::mem::take(&mut *self.state.drop_next_write.lock().unwrap()) {
                return Err(HelperError::ConnectionLost);
            }
            self.state.writes.lock().unwrap().push((index, rpm));
            Ok(true)
        }

        fn get_version(&self) -> Result<String, HelperError> {
            Ok("0.0.0".to_string())
        }
    }

    #[test]
    fn test_starts_without_connection() {
        let client = HelperClient::new();
        assert!(!client.is_connected());
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let client = HelperClient::new();
        client.invalidate();
        client.invalidate();
        assert!(!client.is_connected());
    }

    #[test]
    fn test_connection_created_lazily_then_cached() {
        let connector = ScriptedConnector::default();
        let client = HelperClient::with_connector(connector.clone());
        assert!(!client.is_connected());

        assert!(client.request_fan_speed(0, 3000.0));
        assert!(client.is_connected());
        assert!(client.request_fan_speed(0, 3500.0));
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.writes(), vec![(0, 3000.0), (0, 3500.0)]);
    }

    #[test]
    fn test_lost_connection_reconnects_transparently() {
        let connector = ScriptedConnector::default();
        let client = HelperClient::with_connector(connector.clone());

        assert!(client.request_fan_speed(0, 3000.0));
        assert_eq!(connector.connects(), 1);

        // The connection dies mid-write: the request resolves to false and
        // the dead connection is dropped from the cache.
        connector.drop_next_write();
        assert!(!client.request_fan_speed(0, 4000.0));
        assert!(!client.is_connected());

        // The next request succeeds with no caller-visible reconnect step.
        assert!(client.request_fan_speed(0, 4000.0));
        assert!(client.is_connected());
        assert_eq!(connector.connects(), 2);
        assert_eq!(connector.writes(), vec![(0, 3000.0), (0, 4000.0)]);
    }

    #[test]
    fn test_explicit_invalidation_reconnects() {
        let connector = ScriptedConnector::default();
        let client = HelperClient::with_connector(connector.clone());

        assert!(client.version().is_ok());
        client.invalidate();
        assert!(client.version().is_ok());
        assert_eq!(connector.connects(), 2);
    }

    #[test]
    #[ignore = "Requires a system bus with the helper daemon running"]
    fn test_version_round_trip() {
        let client = HelperClient::new();
        let version = client.version().unwrap();
        assert!(!version.is_empty());
        assert!(client.is_connected());
    }
}

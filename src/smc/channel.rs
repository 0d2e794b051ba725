//! SMC control channel
//!
//! Owns the single open session to the controller service. The channel is
//! an owned value rather than process-global state (typically behind an
//! `Arc` shared by pollers) and the session is released on every exit path
//! via `Drop`.
//!
//! `open()`/`close()` are safe under concurrent invocation: the session
//! mutex serializes the open/close transition, and the same lock naturally
//! serializes transactions from concurrent pollers.

use crate::error::SmcError;
use crate::smc::traits::{SmcConnector, SmcTransport};
use crate::smc::wire::SmcParam;
use std::sync::Mutex;

/// Process-scoped handle to the controller service
pub struct SmcChannel<C: SmcConnector> {
    connector: C,
    session: Mutex<Option<C::Transport>>,
}

impl<C: SmcConnector> SmcChannel<C> {
    /// Create a channel; no session is opened until first use
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: Mutex::new(None),
        }
    }

    /// Open the session; idempotent and race-safe
    ///
    /// Returns true immediately if already open. Returns false if the
    /// service is absent or the open call is rejected; that outcome is
    /// non-fatal and callers degrade to no-data.
    pub fn open(&self) -> bool {
        let mut session = self.session.lock().unwrap();
        if session.is_some() {
            return true;
        }

        match self.connector.connect() {
            Ok(transport) => {
                *session = Some(transport);
                true
            }
            Err(err) => {
                log::debug!("SMC open failed: {err}");
                false
            }
        }
    }

    /// Release the session if open, else no-op
    pub fn close(&self) {
        if self.session.lock().unwrap().take().is_some() {
            log::debug!("SMC session closed");
        }
    }

    /// Whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    /// Issue one synchronous request/response transaction
    ///
    /// # Errors
    /// `ServiceUnavailable` if no session is open; any transport error is
    /// passed through.
    pub fn transact(&self, input: &SmcParam) -> Result<SmcParam, SmcError> {
        let mut session = self.session.lock().unwrap();
        let transport = session
            .as_mut()
            .ok_or_else(|| SmcError::ServiceUnavailable("session not open".to_string()))?;
        transport.transact(input)
    }
}

impl<C: SmcConnector> Drop for SmcChannel<C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnector;

    #[test]
    fn test_open_idempotent() {
        let connector = MockConnector::new();
        let channel = SmcChannel::new(connector.clone());

        assert!(channel.open());
        assert!(channel.open());
        // Device enumeration happened exactly once
        assert_eq!(connector.connect_count(), 1);
    }

    #[test]
    fn test_open_reports_unavailable_service() {
        let connector = MockConnector::new().with_connect_failure();
        let channel = SmcChannel::new(connector.clone());

        assert!(!channel.open());
        assert!(!channel.is_open());
        // Not cached as open: a later attempt retries the connect
        assert!(!channel.open());
        assert_eq!(connector.connect_count(), 2);
    }

    #[test]
    fn test_close_then_reopen() {
        let connector = MockConnector::new();
        let channel = SmcChannel::new(connector.clone());

        assert!(channel.open());
        channel.close();
        assert!(!channel.is_open());
        channel.close(); // no-op
        assert!(channel.open());
        assert_eq!(connector.connect_count(), 2);
    }

    #[test]
    fn test_transact_without_session_fails() {
        let channel = SmcChannel::new(MockConnector::new());
        let err = channel.transact(&SmcParam::default()).unwrap_err();
        assert!(matches!(err, SmcError::ServiceUnavailable(_)));
    }
}

//! Trait definitions for the SMC control channel
//!
//! These traits abstract over the IOKit session to enable testing with
//! mocks: `SmcConnector` locates and opens the controller service,
//! `SmcTransport` carries one synchronous transaction. Production uses the
//! IOKit implementations in [`crate::smc::iokit`]; tests use
//! [`crate::mock`].

use crate::error::SmcError;
use crate::smc::wire::SmcParam;

/// One open session to the controller service
///
/// A transport issues synchronous request/response transactions: one
/// fixed-size parameter block out, one back. No operation here defines a
/// timeout; a stalled controller blocks the caller.
pub trait SmcTransport: Send {
    /// Send one parameter block and receive the response block
    fn transact(&mut self, input: &SmcParam) -> Result<SmcParam, SmcError>;
}

/// Locates the controller service and opens sessions to it
pub trait SmcConnector: Send + Sync {
    /// The transport type produced by this connector
    type Transport: SmcTransport;

    /// Locate the service and open a session handle
    ///
    /// # Errors
    /// Returns `SmcError::ServiceUnavailable` if the service is absent or
    /// the open call is rejected.
    fn connect(&self) -> Result<Self::Transport, SmcError>;
}

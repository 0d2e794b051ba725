//! IOKit-backed SMC transport
//!
//! All unsafe FFI is quarantined in this module; the rest of the crate goes
//! through the [`SmcTransport`]/[`SmcConnector`] traits. Off macOS the
//! connector compiles but always reports `ServiceUnavailable`, so callers
//! degrade to no-data exactly as they do on hardware without a reachable
//! controller.

use crate::error::SmcError;
use crate::smc::key::SmcKey;
use crate::smc::traits::{SmcConnector, SmcTransport};
use crate::smc::wire::SmcParam;

/// Name of the controller service in the IO registry
pub const SMC_SERVICE_NAME: &str = "AppleSMC";

#[cfg(target_os = "macos")]
mod sys {
    use std::ffi::{c_char, c_void};

    pub type MachPort = u32;
    pub type IoObject = u32;
    pub type IoConnect = u32;
    pub type KernReturn = i32;

    pub const KERN_SUCCESS: KernReturn = 0;
    /// Passing 0 as the master port selects the default main port.
    pub const MAIN_PORT_DEFAULT: MachPort = 0;

    #[link(name = "IOKit", kind = "framework")]
    extern "C" {
        pub fn IOServiceMatching(name: *const c_char) -> *mut c_void;
        pub fn IOServiceGetMatchingService(main_port: MachPort, matching: *mut c_void)
            -> IoObject;
        pub fn IOServiceOpen(
            service: IoObject,
            owning_task: MachPort,
            conn_type: u32,
            connect: *mut IoConnect,
        ) -> KernReturn;
        pub fn IOServiceClose(connect: IoConnect) -> KernReturn;
        pub fn IOObjectRelease(object: IoObject) -> KernReturn;
        pub fn IOConnectCallStructMethod(
            connection: IoConnect,
            selector: u32,
            input_struct: *const c_void,
            input_size: usize,
            output_struct: *mut c_void,
            output_size: *mut usize,
        ) -> KernReturn;
    }

    extern "C" {
        pub static mach_task_self_: MachPort;
    }
}

/// Connector that opens sessions to the AppleSMC service
#[derive(Debug, Default, Clone, Copy)]
pub struct IoKitConnector;

impl IoKitConnector {
    pub fn new() -> Self {
        Self
    }
}

impl SmcConnector for IoKitConnector {
    type Transport = IoKitTransport;

    #[cfg(target_os = "macos")]
    fn connect(&self) -> Result<Self::Transport, SmcError> {
        use std::ffi::CString;

        let name = CString::new(SMC_SERVICE_NAME).expect("service name has no NUL");

        // SAFETY: IOServiceGetMatchingService consumes the matching
        // dictionary; the service handle is released after the open call
        // regardless of its outcome.
        unsafe {
            let matching = sys::IOServiceMatching(name.as_ptr());
            let service = sys::IOServiceGetMatchingService(sys::MAIN_PORT_DEFAULT, matching);
            if service == 0 {
                return Err(SmcError::ServiceUnavailable(format!(
                    "{SMC_SERVICE_NAME} service not found in the IO registry"
                )));
            }

            let mut connection: sys::IoConnect = 0;
            let kr = sys::IOServiceOpen(service, sys::mach_task_self_, 0, &mut connection);
            sys::IOObjectRelease(service);

            if kr != sys::KERN_SUCCESS {
                return Err(SmcError::ServiceUnavailable(format!(
                    "IOServiceOpen rejected with kernel result {kr:#x}"
                )));
            }

            log::debug!("Opened {SMC_SERVICE_NAME} session (connection {connection})");
            Ok(IoKitTransport { connection })
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn connect(&self) -> Result<Self::Transport, SmcError> {
        Err(SmcError::ServiceUnavailable(format!(
            "{SMC_SERVICE_NAME} is only reachable on macOS hosts"
        )))
    }
}

/// An open IOKit session to the controller
pub struct IoKitTransport {
    #[cfg(target_os = "macos")]
    connection: sys::IoConnect,
}

impl SmcTransport for IoKitTransport {
    #[cfg(target_os = "macos")]
    fn transact(&mut self, input: &SmcParam) -> Result<SmcParam, SmcError> {
        use crate::smc::wire::SMC_SELECTOR_HANDLE_EVENT;
        use std::ffi::c_void;
        use std::mem::size_of;

        let mut output = SmcParam::default();
        let mut output_size = size_of::<SmcParam>();

        // SAFETY: both blocks are #[repr(C)] with the kernel's exact layout
        // and outlive the call; output_size is in/out and starts at the full
        // block size.
        let kr = unsafe {
            sys::IOConnectCallStructMethod(
                self.connection,
                SMC_SELECTOR_HANDLE_EVENT,
                input as *const SmcParam as *const c_void,
                size_of::<SmcParam>(),
                &mut output as *mut SmcParam as *mut c_void,
                &mut output_size,
            )
        };

        if kr != sys::KERN_SUCCESS {
            return Err(SmcError::TransactionFailed {
                key: SmcKey::from_code(input.key).name(),
                op: input.data8,
                code: kr,
            });
        }

        Ok(output)
    }

    #[cfg(not(target_os = "macos"))]
    fn transact(&mut self, input: &SmcParam) -> Result<SmcParam, SmcError> {
        Err(SmcError::TransactionFailed {
            key: SmcKey::from_code(input.key).name(),
            op: input.data8,
            code: -1,
        })
    }
}

#[cfg(target_os = "macos")]
impl Drop for IoKitTransport {
    fn drop(&mut self) {
        // SAFETY: the connection handle is valid until this drop.
        let kr = unsafe { sys::IOServiceClose(self.connection) };
        if kr != sys::KERN_SUCCESS {
            log::warn!("IOServiceClose returned kernel result {kr:#x}");
        }
    }
}

//! Daemon command implementation
//!
//! Runs the privileged helper in the foreground; meant to be started by
//! the init system as root, not interactively.

use crate::error::Result;
use crate::helper::daemon;

/// Execute the daemon command
pub fn run_daemon() -> Result<()> {
    daemon::run()
}

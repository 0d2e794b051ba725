//! Helper command implementation
//!
//! Queries against the privileged helper daemon.

use crate::cli::args::{HelperArgs, HelperCommands, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::error::Result;
use crate::helper::HelperClient;

/// Execute helper subcommands
pub fn run_helper(args: &HelperArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        HelperCommands::Version => run_helper_version(format),
    }
}

fn run_helper_version(format: OutputFormat) -> Result<()> {
    let client = HelperClient::new();
    let version = client.version()?;

    print_output(
        &Message {
            message: format!("Helper daemon v{version}"),
            success: true,
        },
        format,
    )?;

    Ok(())
}

//! Fan command implementation
//!
//! Handles fan listing, status, speed and watch commands.

use crate::cli::args::{FanArgs, FanCommands, OutputFormat};
use crate::cli::output::{print_output, FanList, Message};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::helper::HelperClient;
use crate::services::FanService;
use crate::smc::{IoKitConnector, SmcClient};
use std::sync::Arc;
use std::time::Duration;

/// Execute the fan list command
pub fn run_fans(format: OutputFormat) -> Result<()> {
    let service = fan_service();
    let fans = service.enumerate();
    print_output(&FanList { fans }, format)?;
    Ok(())
}

/// Execute fan subcommands
pub fn run_fan(args: &FanArgs, format: OutputFormat, dry_run: bool, config: &Config) -> Result<()> {
    match &args.command {
        FanCommands::Status => run_fans(format),
        FanCommands::Set { index, rpm } => run_fan_set(*index, *rpm, format, dry_run, config),
        FanCommands::Watch { interval } => {
            let seconds = interval.unwrap_or(config.general.poll_interval_seconds);
            run_fan_watch(seconds, format)
        }
    }
}

fn run_fan_set(
    index: usize,
    rpm: f64,
    format: OutputFormat,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let service = fan_service();
    let fans = service.enumerate();
    let fan = fans.get(index).ok_or(AppError::FanNotFound(index))?;

    if dry_run {
        let clamped = rpm.clamp(fan.min_rpm, fan.max_rpm);
        print_output(
            &Message {
                message: format!(
                    "[DRY RUN] Would set {} target to {:.0} RPM (requested {:.0})",
                    fan.name, clamped, rpm
                ),
                success: true,
            },
            format,
        )?;
        return Ok(());
    }

    let writer = HelperClient::new();
    if config.helper.ensure_running {
        writer.ensure_running();
    }

    let accepted = service.request_fan_speed(index, rpm, &writer);
    let target = service.fans()[index].target_rpm;

    print_output(
        &Message {
            message: if accepted {
                format!("Set {} target to {:.0} RPM", fan.name, target)
            } else {
                format!("Helper did not accept the {} speed write", fan.name)
            },
            success: accepted,
        },
        format,
    )?;

    Ok(())
}

fn run_fan_watch(interval_seconds: u64, format: OutputFormat) -> Result<()> {
    let service = fan_service();
    if service.enumerate().is_empty() {
        return Err(AppError::NoFansFound);
    }

    loop {
        print_output(&FanList { fans: service.fans() }, format)?;
        std::thread::sleep(Duration::from_secs(interval_seconds.max(1)));
        service.refresh_current();
    }
}

fn fan_service() -> FanService<IoKitConnector> {
    FanService::new(Arc::new(SmcClient::new(IoKitConnector::new())))
}

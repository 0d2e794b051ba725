//! smcctl - SMC fan and sensor control tool
//!
//! A command-line tool for reading System Management Controller sensors
//! and controlling fan speeds through a privileged helper daemon.

use clap::Parser;
use log::LevelFilter;
use smcctl::cli::args::{generate_completions, Cli, Commands};
use smcctl::commands::{run_daemon, run_fan, run_fans, run_helper, run_read, run_sensors};
use smcctl::config::{Config, ConfigFile};
use smcctl::error::AppError;

fn main() {
    // Parse CLI arguments and merge the config file before touching the
    // logger, so --verbose (from either source) shapes the filter itself.
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config.with_cli_overrides(cli.verbose, cli.dry_run),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    log_builder(config.general.verbose, matches!(cli.command, Commands::Daemon)).init();

    // Run the appropriate command
    let result = run(&cli, &config);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

/// Build the logger configuration for one invocation
///
/// `--verbose` overrides everything with debug; otherwise `RUST_LOG` is
/// honored over the built-in default. The daemon defaults to info so its
/// per-write request log survives without extra environment.
fn log_builder(verbose: bool, daemon: bool) -> env_logger::Builder {
    let default = if daemon { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None);
    builder
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::Fans => run_fans(cli.format),

        Commands::Fan(args) => run_fan(args, cli.format, config.general.dry_run, config),

        Commands::Sensors => run_sensors(cli.format),

        Commands::Read { key } => run_read(key, cli.format),

        Commands::Helper(args) => run_helper(args, cli.format),

        Commands::Daemon => run_daemon(),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    match &cli.config {
        // An explicitly named file must exist and parse
        Some(path) => Ok(ConfigFile::load(path)?),
        None => Ok(ConfigFile::load_default().unwrap_or_default()),
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Smc(smcctl::error::SmcError::ServiceUnavailable(_)) => {
            eprintln!();
            eprintln!("Hint: The SMC service was not found on this machine.");
            eprintln!("      Register access only works on supported hardware.");
        }
        AppError::Helper(_) => {
            eprintln!();
            eprintln!("Hint: Fan speed writes go through the helper daemon.");
            eprintln!("      Make sure it is installed and running ('smcctl daemon' as root).");
        }
        AppError::NoFansFound => {
            eprintln!();
            eprintln!("Hint: The controller reported no fans.");
            eprintln!("      Check 'smcctl read FNum' for the raw register.");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_builds_debug_filter() {
        // The flag must shape the filter itself; raising log's max level
        // after an env_logger init cannot loosen the installed filter.
        let logger = log_builder(true, false).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);

        let logger = log_builder(true, true).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_default_filter_depends_on_role() {
        if std::env::var_os("RUST_LOG").is_some() {
            // The environment outranks the built-in defaults
            return;
        }
        let logger = log_builder(false, false).build();
        assert_eq!(logger.filter(), LevelFilter::Warn);

        // The daemon's per-write request log is emitted at info
        let logger = log_builder(false, true).build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }
}

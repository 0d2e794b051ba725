//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// SMC-based fan and sensor control tool
///
/// Read System Management Controller sensors and control fan speeds.
#[derive(Parser, Debug)]
#[command(name = "smcctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SMCCTL_CONFIG")]
    pub config: Option<String>,

    /// Dry run mode - don't actually apply changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all fans with their current, minimum, maximum and target speeds
    Fans,

    /// Control fan settings
    Fan(FanArgs),

    /// Show sensor readings (temperatures and power)
    Sensors,

    /// Read a single register by its four-character key
    Read {
        /// Register key, e.g. TG0P or FNum
        key: String,
    },

    /// Interact with the privileged helper daemon
    Helper(HelperArgs),

    /// Run the privileged helper daemon (requires root)
    Daemon,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for fan control commands
#[derive(Parser, Debug)]
pub struct FanArgs {
    #[command(subcommand)]
    pub command: FanCommands,
}

/// Fan subcommands
#[derive(Subcommand, Debug)]
pub enum FanCommands {
    /// Show current fan status
    Status,

    /// Set a fan's target speed (routed through the helper daemon)
    Set {
        /// Fan index (0-based)
        index: usize,

        /// Target speed in RPM (clamped to the fan's supported range)
        #[arg(value_parser = clap::value_parser!(f64))]
        rpm: f64,
    },

    /// Continuously poll fan speeds
    Watch {
        /// Poll interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Arguments for helper daemon commands
#[derive(Parser, Debug)]
pub struct HelperArgs {
    #[command(subcommand)]
    pub command: HelperCommands,
}

/// Helper subcommands
#[derive(Subcommand, Debug)]
pub enum HelperCommands {
    /// Query the running daemon's version
    Version,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fans() {
        let args = Cli::try_parse_from(["smcctl", "fans"]).unwrap();
        assert!(matches!(args.command, Commands::Fans));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["smcctl", "-v", "sensors"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_fan_set() {
        let args = Cli::try_parse_from(["smcctl", "fan", "set", "0", "3500"]).unwrap();
        if let Commands::Fan(fan_args) = args.command {
            if let FanCommands::Set { index, rpm } = fan_args.command {
                assert_eq!(index, 0);
                assert_eq!(rpm, 3500.0);
            } else {
                panic!("Expected Set command");
            }
        } else {
            panic!("Expected Fan command");
        }
    }

    #[test]
    fn test_cli_fan_set_requires_rpm() {
        let result = Cli::try_parse_from(["smcctl", "fan", "set", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_read_key() {
        let args = Cli::try_parse_from(["smcctl", "read", "TG0P"]).unwrap();
        if let Commands::Read { key } = args.command {
            assert_eq!(key, "TG0P");
        } else {
            panic!("Expected Read command");
        }
    }

    #[test]
    fn test_cli_parse_watch_interval() {
        let args = Cli::try_parse_from(["smcctl", "fan", "watch", "--interval", "5"]).unwrap();
        if let Commands::Fan(fan_args) = args.command {
            if let FanCommands::Watch { interval } = fan_args.command {
                assert_eq!(interval, Some(5));
            } else {
                panic!("Expected Watch command");
            }
        } else {
            panic!("Expected Fan command");
        }
    }

    #[test]
    fn test_cli_parse_helper_version() {
        let args = Cli::try_parse_from(["smcctl", "helper", "version"]).unwrap();
        if let Commands::Helper(helper_args) = args.command {
            assert!(matches!(helper_args.command, HelperCommands::Version));
        } else {
            panic!("Expected Helper command");
        }
    }

    #[test]
    fn test_cli_parse_dry_run_global() {
        let args = Cli::try_parse_from(["smcctl", "fan", "set", "0", "2000", "--dry-run"]).unwrap();
        assert!(args.dry_run);
    }
}

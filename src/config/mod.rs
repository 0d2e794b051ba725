//! Configuration system
//!
//! Handles TOML config file parsing; CLI flags override file values.

pub mod file;

pub use file::ConfigFile;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Helper daemon settings
    pub helper: HelperConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Dry run mode: log writes instead of performing them
    pub dry_run: bool,
    /// Interval between fan polls for watch-style commands, in seconds
    pub poll_interval_seconds: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            dry_run: false,
            poll_interval_seconds: 2,
        }
    }
}

/// Helper daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// Ping the daemon before the first write of a session
    pub ensure_running: bool,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            ensure_running: true,
        }
    }
}

impl Config {
    /// Apply CLI overrides on top of file values
    pub fn with_cli_overrides(mut self, verbose: bool, dry_run: bool) -> Self {
        if verbose {
            self.general.verbose = true;
        }
        if dry_run {
            self.general.dry_run = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.poll_interval_seconds, 2);
        assert!(!config.general.dry_run);
        assert!(config.helper.ensure_running);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(true, true);
        assert!(config.general.verbose);
        assert!(config.general.dry_run);

        // Absent flags leave file values alone
        let mut file_config = Config::default();
        file_config.general.verbose = true;
        let config = file_config.with_cli_overrides(false, false);
        assert!(config.general.verbose);
    }
}

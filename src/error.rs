//! Unified error types for smcctl
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! Note that the public surface of the SMC client absorbs most of these
//! into `Option`/`bool` results: the controller may legitimately be absent
//! (different hardware generation, virtualization, sandboxing), so nothing
//! here is allowed to take the process down.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from SMC operations
    #[error("SMC error: {0}")]
    Smc(#[from] SmcError),

    /// Error from the privileged helper channel
    #[error("Helper error: {0}")]
    Helper(#[from] HelperError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Fan not found at index
    #[error("Fan not found at index {0}")]
    FanNotFound(usize),

    /// No controllable fans reported by the controller
    #[error("No fans reported by the SMC")]
    NoFansFound,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the SMC control channel and register protocol
#[derive(Error, Debug)]
pub enum SmcError {
    /// The controller service is absent or the open call was rejected
    #[error("SMC service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A single register transaction returned a non-success status
    #[error("SMC transaction failed for key '{key}' (op {op}): kernel result {code:#x}")]
    TransactionFailed { key: String, op: u8, code: i32 },

    /// Raw bytes could not be decoded under the declared type tag
    #[error("Cannot decode {len}-byte value with type tag '{tag}'")]
    DecodeFailed { tag: String, len: usize },
}

/// Errors from the client-side proxy to the privileged helper
#[derive(Error, Debug)]
pub enum HelperError {
    /// D-Bus transport error
    #[error("Helper bus error: {0}")]
    Bus(#[from] zbus::Error),

    /// The cached connection was invalidated or interrupted
    ///
    /// Silently recovered: the next call re-establishes the connection.
    #[error("Helper connection lost")]
    ConnectionLost,

    /// The daemon performed the write and reported failure
    ///
    /// No further detail crosses the IPC boundary; surfaced as `false`.
    #[error("Remote write operation failed")]
    RemoteOperationFailed,
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid SMC key name (must be 1-4 ASCII bytes)
    #[error("Invalid SMC key name: '{0}' (must be 1-4 ASCII characters)")]
    InvalidKey(String),

    /// Invalid target RPM for a fan's bounds
    #[error("Invalid target speed: {rpm} RPM (valid range: {min}-{max} RPM)")]
    InvalidTargetRpm { rpm: u32, min: u32, max: u32 },

    /// Invalid value provided
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InvalidTargetRpm {
            rpm: 9000,
            min: 1200,
            max: 6000,
        };
        assert!(err.to_string().contains("9000 RPM"));
        assert!(err.to_string().contains("1200-6000"));
    }

    #[test]
    fn test_smc_error_display() {
        let err = SmcError::TransactionFailed {
            key: "F0Ac".to_string(),
            op: 5,
            code: 0x2c7,
        };
        assert!(err.to_string().contains("F0Ac"));
        assert!(err.to_string().contains("op 5"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = SmcError::DecodeFailed {
            tag: "ch8*".to_string(),
            len: 16,
        };
        assert!(err.to_string().contains("ch8*"));
        assert!(err.to_string().contains("16-byte"));
    }

    #[test]
    fn test_error_conversion() {
        let domain_err = DomainError::InvalidKey("TOOLONG".to_string());
        let app_err: AppError = domain_err.into();
        assert!(matches!(app_err, AppError::Domain(_)));
    }
}

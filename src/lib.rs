//! smcctl - SMC register client library
//!
//! This library provides the core functionality for reading System
//! Management Controller registers (fans, temperatures, power) and for
//! fan speed control through a privilege-separated helper daemon.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`helper`]: Privileged helper daemon and its client proxy
//! - [`services`]: Business logic services
//! - [`smc`]: SMC control channel and register protocol

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod helper;
pub mod services;
pub mod smc;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};

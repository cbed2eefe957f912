//! Command-line front end for `dapptokens` payments.
//!
//! # Modules
//!
//! - [`cli`] - Command-line arguments
//! - [`config`] - TOML configuration with environment variable expansion
//! - [`commands`] - Command execution
//! - [`error`] - CLI error types

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use error::CliError;

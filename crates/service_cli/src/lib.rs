//! # fmodeler_cli: Command-Line Host for FintechModeler
//!
//! Wires the model layer to the outside world: TOML configuration with
//! environment overrides, CSV price input, table/JSON output and logging
//! initialisation. The `fmodeler` binary is a thin argument parser over
//! [`commands`].

#![deny(missing_docs)]

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use error::{CliError, Result};

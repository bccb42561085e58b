//! Command-line interface for streamcheck.
//!
//! This module provides CLI commands for running the reconciliation
//! pipeline, spot-checking single albums, and managing configuration.

mod commands;

pub use commands::{Cli, Commands, ProviderArg, run_command};

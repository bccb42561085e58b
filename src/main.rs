//! Streamcheck - checks albums against streaming catalogs.
//!
//! Reads line-oriented JSON album records, looks each album up on Spotify
//! and Rdio, and writes the records back out annotated with whether (and
//! where) the album can be streamed.

pub mod availability;
pub mod cli;
pub mod config;
pub mod error;
#[cfg(test)]
pub mod test_utils;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    init_logging(args.log_file.as_deref())?;

    if let Err(e) = cli::run_command(&args) {
        tracing::error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

/// Logs go to stderr, or to `log_file` when given; stdout carries output records.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamcheck=info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

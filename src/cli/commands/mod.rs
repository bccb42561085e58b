//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `compare`: the reconciliation pipeline
//! - `lookup`: single-album lookups and normalization checks
//! - `settings`: configuration inspection and creation

mod compare;
mod lookup;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::availability::Provider;
use crate::config::{self, Config};

pub use compare::cmd_compare;
pub use lookup::{cmd_lookup, cmd_normalize};
pub use settings::{cmd_check_config, cmd_init_config};

/// Streamcheck CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "STREAMCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append diagnostic logs to this file instead of stderr
    #[arg(long, global = true, env = "STREAMCHECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Country code availability is judged for (overrides config)
    #[arg(long, global = true, env = "STREAMCHECK_COUNTRY")]
    pub country: Option<String>,

    /// Rdio consumer key (overrides config)
    #[arg(long, global = true, env = "RDIO_CONSUMER_KEY", hide_env_values = true)]
    pub rdio_key: Option<String>,

    /// Rdio consumer secret (overrides config)
    #[arg(long, global = true, env = "RDIO_CONSUMER_SECRET", hide_env_values = true)]
    pub rdio_secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Enrich line-oriented JSON album records with streaming availability
    Compare {
        /// Input files, processed in order (stdin when empty or "-")
        inputs: Vec<PathBuf>,
        /// Deduplication reference file (defaults to ./aoty_dedupe.json if present)
        #[arg(long)]
        reference: Option<PathBuf>,
    },
    /// Look up a single album
    Lookup {
        /// Artist name
        #[arg(long)]
        artist: String,
        /// Album title
        #[arg(long)]
        album: String,
        /// Only query this provider
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },
    /// Print the normalized form used for matching
    Normalize {
        /// Names to normalize
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the resolved configuration
    CheckConfig,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Provider selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Spotify,
    Rdio,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Spotify => Provider::Spotify,
            ProviderArg::Rdio => Provider::Rdio,
        }
    }
}

impl Cli {
    /// Load the config file and apply command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = config::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(country) = &self.country {
            config.catalog.country = country.clone();
        }
        if let Some(key) = &self.rdio_key {
            config.credentials.rdio_consumer_key = Some(key.clone());
        }
        if let Some(secret) = &self.rdio_secret {
            config.credentials.rdio_consumer_secret = Some(secret.clone());
        }
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compare { inputs, reference } => {
            let config = cli.resolve_config()?;
            let rt = Runtime::new()?;
            cmd_compare(&rt, &config, inputs, reference.as_deref())
        }
        Commands::Lookup {
            artist,
            album,
            provider,
        } => {
            let config = cli.resolve_config()?;
            let rt = Runtime::new()?;
            cmd_lookup(&rt, &config, artist, album, provider.map(Provider::from))
        }
        Commands::Normalize { text } => cmd_normalize(text),
        Commands::CheckConfig => {
            let config = cli.resolve_config()?;
            cmd_check_config(&config, cli.config.as_deref())
        }
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), *force),
    }
}

//! Configuration commands.

use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::Error;

/// Show the resolved configuration, with secrets masked
pub fn cmd_check_config(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let source = path.map(Path::to_path_buf).or_else(config::config_path);
    match source {
        Some(p) if p.exists() => println!("Config file: {:?}", p),
        Some(p) => println!("Config file: {:?} (not found, using defaults)", p),
        None => println!("Config file: none (using defaults)"),
    }
    println!();

    println!("Country:      {}", config.catalog.country);
    println!("Max attempts: {}", config.retry.max_attempts);
    println!("Pacing:       {} ms", config.pacing.delay_ms);
    println!();

    println!("Endpoints:");
    println!("  Spotify search: {}", config.endpoints.spotify_search_url);
    println!("  Rdio API:       {}", config.endpoints.rdio_api_url);
    println!("  Rdio web:       {}", config.endpoints.rdio_web_origin);
    println!();

    println!("Credentials:");
    print_secret("Rdio consumer key", config.credentials.rdio_consumer_key.as_deref());
    print_secret(
        "Rdio consumer secret",
        config.credentials.rdio_consumer_secret.as_deref(),
    );

    Ok(())
}

fn print_secret(label: &str, value: Option<&str>) {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => println!("  ✓ {}: {}", label, mask(v)),
        None => println!("  ✗ {}: not set", label),
    }
}

/// Keep the first few characters of a secret
fn mask(value: &str) -> String {
    let shown: String = value.chars().take(4).collect();
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", shown)
    }
}

/// Write a default config file
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let written = init_config(path, force)?;
    println!("✓ Wrote default config to {:?}", written);
    println!("  Add your Rdio consumer key and secret under [credentials].");
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path().ok_or(config::ConfigError::NoConfigDir)?,
    };
    if target.exists() && !force {
        return Err(Error::config(format!(
            "{:?} already exists (use --force to overwrite)",
            target
        ))
        .into());
    }
    Ok(config::save(&Config::default(), Some(&target))?)
}

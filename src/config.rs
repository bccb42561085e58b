//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\streamcheck\config.toml
//! - macOS: ~/Library/Application Support/streamcheck/config.toml
//! - Linux: ~/.config/streamcheck/config.toml
//!
//! A different file can be named with `--config`. Settings are loaded once
//! at startup and never change during a run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::availability::{AvailabilityConfig, rdio, retry, spotify};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where availability is judged
    pub catalog: CatalogConfig,

    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Retry behaviour for provider calls
    pub retry: RetryConfig,

    /// Delay between records
    pub pacing: PacingConfig,

    /// Provider endpoints
    pub endpoints: EndpointConfig,
}

/// Catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// ISO country code, e.g. "US"
    pub country: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
        }
    }
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Rdio OAuth consumer key
    pub rdio_consumer_key: Option<String>,
    /// Rdio OAuth consumer secret
    pub rdio_consumer_secret: Option<String>,
}

/// Retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per provider call before the run is aborted
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Milliseconds to wait after each record
    pub delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

/// Provider endpoints (override for testing against a local server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub spotify_search_url: String,
    pub rdio_api_url: String,
    pub rdio_web_origin: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            spotify_search_url: spotify::DEFAULT_SEARCH_URL.to_string(),
            rdio_api_url: rdio::DEFAULT_API_URL.to_string(),
            rdio_web_origin: rdio::DEFAULT_WEB_ORIGIN.to_string(),
        }
    }
}

impl Config {
    /// Settings for the availability service
    pub fn availability(&self) -> AvailabilityConfig {
        AvailabilityConfig {
            country: self.catalog.country.clone(),
            rdio_consumer_key: self.credentials.rdio_consumer_key.clone().unwrap_or_default(),
            rdio_consumer_secret: self
                .credentials
                .rdio_consumer_secret
                .clone()
                .unwrap_or_default(),
            max_attempts: self.retry.max_attempts,
            spotify_search_url: self.endpoints.spotify_search_url.clone(),
            rdio_api_url: self.endpoints.rdio_api_url.clone(),
            rdio_web_origin: self.endpoints.rdio_web_origin.clone(),
        }
    }

    /// Delay between records
    pub fn pacing(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pacing.delay_ms)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("streamcheck"))
}

/// Get the full path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one, the default
/// location is tried and a missing file yields defaults. A file that exists
/// but can't be parsed is always an error.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(path) = config_path() else {
                tracing::warn!("Could not determine config directory, using defaults");
                return Ok(Config::default());
            };
            if !path.exists() {
                tracing::info!("No config file found at {:?}, using defaults", path);
                return Ok(Config::default());
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`, or the default location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    // Ensure directory exists
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::temp_file;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[retry]"));
        assert!(toml.contains("[pacing]"));
        assert!(toml.contains("[endpoints]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = temp_file(
            r#"
[credentials]
rdio_consumer_key = "my-key"
"#,
        );
        let config = load(Some(file.path())).unwrap();

        assert_eq!(
            config.credentials.rdio_consumer_key,
            Some("my-key".to_string())
        );
        assert_eq!(config.catalog.country, "US");
        assert_eq!(config.retry.max_attempts, 100);
        assert_eq!(config.pacing.delay_ms, 1000);
        assert_eq!(config.endpoints.rdio_web_origin, "http://rdio.com");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let file = temp_file("[catalog\ncountry = ");
        assert!(matches!(load(Some(file.path())), Err(ConfigError::Parse(..))));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Read(..))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog.country = "GB".to_string();
        config.pacing.delay_ms = 250;
        save(&config, Some(&path)).unwrap();

        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.catalog.country, "GB");
        assert_eq!(loaded.pacing.delay_ms, 250);
    }

    #[test]
    fn test_availability_settings() {
        let mut config = Config::default();
        config.credentials.rdio_consumer_key = Some("k".to_string());
        config.retry.max_attempts = 7;

        let availability = config.availability();

        assert_eq!(availability.rdio_consumer_key, "k");
        assert!(availability.rdio_consumer_secret.is_empty());
        assert_eq!(availability.max_attempts, 7);
        assert_eq!(config.pacing(), std::time::Duration::from_secs(1));
    }
}

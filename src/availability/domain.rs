//! Internal domain models for streaming availability lookups.
//!
//! These types are OUR types - they don't change when external APIs change.
//! Provider responses get converted into [`CatalogHit`] via each provider's adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One album to reconcile against the catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRequest {
    pub artist: String,
    pub album: String,
}

impl AlbumRequest {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }
}

impl fmt::Display for AlbumRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artist, self.album)
    }
}

/// Outcome of looking one album up on one provider
///
/// `url` is `None` when no hit matched; `can_stream` is only true when a
/// matching hit was also streamable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResult {
    pub can_stream: bool,
    pub url: Option<String>,
}

impl StreamResult {
    /// Result for a query the provider refused to answer, or that matched nothing
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// A single search candidate, normalized into a provider-independent shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogHit {
    /// Album title as the provider spells it
    pub name: String,
    /// Credited artists (Rdio only ever has one)
    pub artists: Vec<String>,
    /// Canonical URL for the album on the provider
    pub url: String,
    /// Whether the provider reports this album as playable on demand
    pub streamable: bool,
}

/// External catalogs we query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Spotify,
    Rdio,
}

impl Provider {
    /// Field name used for this provider in enriched output records
    pub fn field_name(self) -> &'static str {
        match self {
            Provider::Spotify => "spotify",
            Provider::Rdio => "rdio",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Errors that escape a provider lookup
///
/// Transient failures never show up here; they are absorbed by the retry loop
/// until the attempt budget runs out.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("no more tries searching {provider} for {artist}/{album} after {attempts} attempts")]
    ExhaustedRetries {
        provider: Provider,
        artist: String,
        album: String,
        attempts: u32,
    },

    #[error("Failed to build HTTP client: {0}")]
    Http(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Missing credentials for {0}")]
    MissingCredentials(Provider),
}

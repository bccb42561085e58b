//! Spotify search API Data Transfer Objects
//!
//! These types match what the album search endpoint returns.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! We only use `/search/1/album.json`. Only fields we read are declared, so
//! surprises elsewhere in the payload don't fail the whole response.

use serde::Deserialize;

/// Album search response
///
/// `albums` is required: a 200 without it is treated as a bad response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching albums, in relevance order
    pub albums: Vec<Album>,
}

/// Album entry
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    /// Album title
    pub name: String,
    /// Spotify URI (e.g. "spotify:album:...")
    pub href: String,
    /// Credited artists; the requested artist may not be first
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Where the album can be played
    #[serde(default)]
    pub availability: Option<Availability>,
}

/// Artist credit
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Territory availability
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Availability {
    /// Space separated ISO country codes, or "worldwide"
    #[serde(default)]
    pub territories: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================

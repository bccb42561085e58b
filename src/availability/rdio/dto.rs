//! Rdio web service Data Transfer Objects
//!
//! These types match what the `search` method returns.
//! DO NOT use these types outside the rdio module - convert to domain types.
//!
//! The hit list sits one level down, in `result.results`. A response where
//! that list is missing or null is not usable even with a 200 status.
//!
//! Only fields we read are declared. Unexpected values in any other field
//! must not fail the whole response.

use serde::Deserialize;

/// Envelope for every Rdio API call
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Error message when `status` is "error"
    pub message: Option<String>,
    pub result: Option<SearchResult>,
}

/// Search payload
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub results: Option<Vec<Album>>,
}

/// Album object as returned by search with `types=Album`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Album title
    pub name: String,
    /// Primary artist name
    pub artist: String,
    /// Path relative to the Rdio web origin (e.g. "/artist/Pixies/album/Doolittle/")
    pub url: String,
    /// Whether the album can be streamed in the requested region (may be null)
    #[serde(default)]
    pub can_stream: Option<bool>,
}

impl SearchResponse {
    /// The hit list, if the response carries one
    pub fn into_results(self) -> Option<Vec<Album>> {
        self.result.and_then(|r| r.results)
    }
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================

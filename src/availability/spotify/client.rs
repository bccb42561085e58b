//! Spotify HTTP client
//!
//! Handles communication with the Spotify metadata search service.
//!
//! ## API Quirks
//!
//! ### Sporadic 502s
//! The search endpoint throws occasional 502 (and other 5xx) responses under
//! load. These are classified as retryable and absorbed by the retry engine.
//!
//! ### 403 for some queries
//! Certain queries (e.g. `!!! AND "Strange Weather, Isn't It?"`) get a 403
//! every time. That status is a permanent rejection: the album is reported as
//! not streamable rather than retried.

use super::{adapter, dto};
use crate::availability::domain::{AlbumRequest, CatalogHit, LookupError};
use crate::availability::retry::SearchAttempt;

/// Default search endpoint
pub const DEFAULT_SEARCH_URL: &str = "http://ws.spotify.com/search/1/album.json";

/// Status Spotify returns for queries it will never answer
const REJECTED_STATUS: u16 = 403;

/// Spotify search client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    search_url: String,
    country: String,
}

impl SpotifyClient {
    /// Create a new client searching `search_url`, judging availability for `country`
    pub fn new(
        search_url: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(crate::availability::USER_AGENT)
            .build()
            .map_err(|e| LookupError::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            search_url: search_url.into(),
            country: country.into(),
        })
    }

    /// Query string sent for an album: `artist AND "album"`
    pub fn search_query(request: &AlbumRequest) -> String {
        format!("{} AND \"{}\"", request.artist, request.album)
    }

    fn search_url_for(&self, request: &AlbumRequest) -> String {
        format!(
            "{}?q={}",
            self.search_url,
            urlencoding::encode(&Self::search_query(request))
        )
    }

    /// Make one search request and classify the outcome
    pub async fn search_once(&self, request: &AlbumRequest) -> SearchAttempt<Vec<CatalogHit>> {
        let url = self.search_url_for(request);

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                return SearchAttempt::Retryable {
                    status: None,
                    reason: format!("request to {} failed: {}", url, e),
                };
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return SearchAttempt::Retryable {
                    status: Some(status),
                    reason: format!("failed to read body from {}: {}", url, e),
                };
            }
        };

        classify(status, &body, &self.country)
    }
}

/// Classify a raw Spotify response
pub(crate) fn classify(status: u16, body: &str, country: &str) -> SearchAttempt<Vec<CatalogHit>> {
    match status {
        200 => match serde_json::from_str::<dto::SearchResponse>(body) {
            Ok(response) => SearchAttempt::Success(adapter::to_hits(response, country)),
            Err(e) => SearchAttempt::Retryable {
                status: Some(status),
                reason: format!("unexpected json from spotify: {}", e),
            },
        },
        REJECTED_STATUS => SearchAttempt::PermanentRejection { status },
        _ => SearchAttempt::Retryable {
            status: Some(status),
            reason: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
        },
    }
}

//! Trait definitions for catalog search clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real Spotify and Rdio clients, while tests
//! substitute scripted implementations.
//!
//! # Example
//!
//! ```ignore
//! use streamcheck::availability::traits::CatalogApi;
//!
//! async fn first_hit<T: CatalogApi>(client: &T, request: &AlbumRequest) {
//!     if let SearchAttempt::Success(hits) = client.search_once(request).await {
//!         println!("{:?}", hits.first());
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::domain::{AlbumRequest, CatalogHit, Provider};
use super::retry::SearchAttempt;

/// A catalog that can be searched for albums.
///
/// `search_once` performs exactly one request and classifies the outcome;
/// retrying is the caller's job.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Which provider this client talks to
    fn provider(&self) -> Provider;

    /// Search once for `request`, returning uniform hits on success
    async fn search_once(&self, request: &AlbumRequest) -> SearchAttempt<Vec<CatalogHit>>;
}

#[async_trait]
impl CatalogApi for super::spotify::SpotifyClient {
    fn provider(&self) -> Provider {
        Provider::Spotify
    }

    async fn search_once(&self, request: &AlbumRequest) -> SearchAttempt<Vec<CatalogHit>> {
        self.search_once(request).await
    }
}

#[async_trait]
impl CatalogApi for super::rdio::RdioClient {
    fn provider(&self) -> Provider {
        Provider::Rdio
    }

    async fn search_once(&self, request: &AlbumRequest) -> SearchAttempt<Vec<CatalogHit>> {
        self.search_once(request).await
    }
}

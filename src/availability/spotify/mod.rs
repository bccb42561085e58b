//! Spotify metadata search integration
//!
//! Unauthenticated album search; a match carries a territory list we check
//! against the configured country.
//!
//! API docs: https://developer.spotify.com/technologies/metadata-api/search/

mod adapter;
mod client;
pub mod dto;

pub use adapter::to_hits;
pub use client::{DEFAULT_SEARCH_URL, SpotifyClient};

//! Adapter layer: Convert Rdio DTOs to domain hits

use super::dto;
use crate::availability::domain::CatalogHit;

/// Convert search results into hits with absolute URLs under `web_origin`
pub fn to_hits(results: Vec<dto::Album>, web_origin: &str) -> Vec<CatalogHit> {
    let origin = web_origin.trim_end_matches('/');
    results
        .into_iter()
        .map(|album| CatalogHit {
            name: album.name,
            artists: vec![album.artist],
            url: format!("{}{}", origin, album.url),
            streamable: album.can_stream.unwrap_or(false),
        })
        .collect()
}

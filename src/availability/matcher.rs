//! Decide whether a search result set contains the requested album.

use super::domain::{AlbumRequest, CatalogHit, StreamResult};
use super::normalize::normalize;

/// Scan `hits` in provider order and build the availability result.
///
/// A hit matches when its normalized title equals the requested album and any
/// credited artist normalizes to the requested artist. Every match overwrites
/// the URL, so the last matching hit supplies it; `can_stream` is true if any
/// matching hit is streamable.
pub fn match_hits(hits: &[CatalogHit], request: &AlbumRequest) -> StreamResult {
    let album = normalize(&request.album);
    let artist = normalize(&request.artist);

    let mut result = StreamResult::unavailable();

    for hit in hits {
        if normalize(&hit.name) != album {
            continue;
        }
        if !hit.artists.iter().any(|name| normalize(name) == artist) {
            continue;
        }

        result.url = Some(hit.url.clone());
        if hit.streamable {
            result.can_stream = true;
        }
    }

    result
}

//! Adapter layer: Convert Spotify DTOs to domain hits
//!
//! This is the ONLY place where Spotify DTO types are converted to domain types.

use super::dto;
use crate::availability::domain::CatalogHit;

/// Territory value meaning "available everywhere"
const WORLDWIDE: &str = "worldwide";

/// Convert a search response into hits, judging streamability for `country`
pub fn to_hits(response: dto::SearchResponse, country: &str) -> Vec<CatalogHit> {
    response
        .albums
        .into_iter()
        .map(|album| {
            let streamable = album
                .availability
                .as_ref()
                .and_then(|a| a.territories.as_deref())
                .is_some_and(|territories| is_available_in(territories, country));
            CatalogHit {
                name: album.name,
                artists: album.artists.into_iter().map(|a| a.name).collect(),
                url: album.href,
                streamable,
            }
        })
        .collect()
}

fn is_available_in(territories: &str, country: &str) -> bool {
    territories == WORLDWIDE || territories.split(' ').any(|code| code == country)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(name: &str, territories: &str) -> dto::Album {
        dto::Album {
            name: name.to_string(),
            href: format!("spotify:album:{}", name.to_lowercase()),
            artists: vec![
                dto::Artist {
                    name: "First".to_string(),
                },
                dto::Artist {
                    name: "Second".to_string(),
                },
            ],
            availability: Some(dto::Availability {
                territories: Some(territories.to_string()),
            }),
        }
    }

    fn response(albums: Vec<dto::Album>) -> dto::SearchResponse {
        dto::SearchResponse { albums }
    }

    #[test]
    fn test_country_in_territories() {
        let hits = to_hits(response(vec![album("A", "CA US MX")]), "US");
        assert!(hits[0].streamable);
    }

    #[test]
    fn test_country_not_in_territories() {
        let hits = to_hits(response(vec![album("A", "GB DE")]), "US");
        assert!(!hits[0].streamable);
    }

    #[test]
    fn test_country_code_must_match_whole_token() {
        let hits = to_hits(response(vec![album("A", "USA")]), "US");
        assert!(!hits[0].streamable);
    }

    #[test]
    fn test_worldwide() {
        let hits = to_hits(response(vec![album("A", "worldwide")]), "US");
        assert!(hits[0].streamable);
    }

    #[test]
    fn test_missing_territories_not_streamable() {
        let mut a = album("A", "");
        a.availability = Some(dto::Availability { territories: None });
        let mut b = album("B", "");
        b.availability = None;

        let hits = to_hits(response(vec![a, b]), "US");

        assert!(!hits[0].streamable);
        assert!(!hits[1].streamable);
    }

    #[test]
    fn test_keeps_order_and_all_artists() {
        let hits = to_hits(response(vec![album("A", ""), album("B", "")]), "US");
        assert_eq!(hits[0].name, "A");
        assert_eq!(hits[1].name, "B");
        assert_eq!(hits[0].artists, vec!["First", "Second"]);
        assert_eq!(hits[1].url, "spotify:album:b");
    }
}

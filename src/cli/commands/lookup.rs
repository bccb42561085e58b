//! Single-album lookup and normalization commands.

use serde_json::{Map, Value};
use tokio::runtime::Runtime;

use crate::availability::{AlbumRequest, AvailabilityService, Provider, normalize};
use crate::config::Config;
use crate::error::ResultExt;

/// Look one album up and print the result as JSON
///
/// Without `provider` both catalogs are queried, Spotify first.
pub fn cmd_lookup(
    rt: &Runtime,
    config: &Config,
    artist: &str,
    album: &str,
    provider: Option<Provider>,
) -> anyhow::Result<()> {
    let service = AvailabilityService::new(&config.availability())
        .with_context("Failed to set up providers")?;
    let request = AlbumRequest::new(artist, album);
    let providers = match provider {
        Some(provider) => vec![provider],
        None => vec![Provider::Spotify, Provider::Rdio],
    };

    let output = rt.block_on(lookup_all(&service, &request, &providers))?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}

async fn lookup_all(
    service: &AvailabilityService,
    request: &AlbumRequest,
    providers: &[Provider],
) -> crate::error::Result<Map<String, Value>> {
    let mut output = Map::new();
    output.insert("artist".to_string(), Value::from(request.artist.as_str()));
    output.insert("album".to_string(), Value::from(request.album.as_str()));

    for &provider in providers {
        let result = service
            .lookup(provider, request)
            .await
            .with_context(format!("Lookup on {} failed", provider))?;
        output.insert(provider.field_name().to_string(), serde_json::to_value(&result)?);
    }
    Ok(output)
}

/// Print the normalized form of each argument
pub fn cmd_normalize(text: &[String]) -> anyhow::Result<()> {
    for t in text {
        println!("{:?} -> {:?}", t, normalize(t));
    }
    Ok(())
}

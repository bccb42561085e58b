//! Deduplication reference set.
//!
//! A JSON array of previously seen albums, loaded once at startup and only
//! read afterwards. Entries are keyed by normalized artist and album so the
//! lookup agrees with the matcher about what counts as "the same album".
//!
//! ```json
//! [{"artist": "Pixies", "album": "Doolittle", "rank": 3}, ...]
//! ```
//!
//! Fields other than `artist` and `album` are ignored, as are entries that
//! lack either.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use super::domain::AlbumRequest;
use super::normalize::normalize;
use crate::error::{Error, Result};

/// Read-only set of known albums
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    keys: HashSet<(String, String)>,
    skipped: usize,
}

impl ReferenceSet {
    /// An empty set (nothing is known)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the set from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::reference(path, e.to_string()))?;
        let set = Self::from_json(&contents).map_err(|message| Error::reference(path, message))?;

        tracing::info!(
            path = %path.display(),
            albums = set.len(),
            skipped = set.skipped,
            "Loaded reference set"
        );
        Ok(set)
    }

    /// Parse the set from JSON text
    pub fn from_json(contents: &str) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let Value::Array(entries) = value else {
            return Err("expected a JSON array of album objects".to_string());
        };

        let mut set = Self::empty();
        for entry in &entries {
            let artist = entry.get("artist").and_then(Value::as_str);
            let album = entry.get("album").and_then(Value::as_str);
            match (artist, album) {
                (Some(artist), Some(album)) => {
                    set.keys.insert(key(artist, album));
                }
                _ => set.skipped += 1,
            }
        }
        Ok(set)
    }

    /// Whether the album is already in the set
    pub fn contains(&self, request: &AlbumRequest) -> bool {
        self.keys.contains(&key(&request.artist, &request.album))
    }

    /// Number of distinct albums
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn key(artist: &str, album: &str) -> (String, String) {
    (normalize(artist), normalize(album))
}

//! Test utilities and fixtures for streamcheck tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::hit;
//!
//! let hits = vec![hit("Doolittle", &["Pixies"], "spotify:album:1", true)];
//! ```

use std::io::Write;

use tempfile::NamedTempFile;

use crate::availability::CatalogHit;

/// Creates a catalog hit.
pub fn hit(name: &str, artists: &[&str], url: &str, streamable: bool) -> CatalogHit {
    CatalogHit {
        name: name.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        url: url.to_string(),
        streamable,
    }
}

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_fixture() {
        let h = hit("A", &["B", "C"], "u", false);
        assert_eq!(h.artists, vec!["B", "C"]);
        assert!(!h.streamable);
    }

    #[test]
    fn test_temp_file_fixture() {
        let file = temp_file("hello");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "hello");
    }
}

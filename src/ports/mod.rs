pub mod destination;
pub mod source;

use std::time::Duration;

/// Catalog-neutral representation of a track, used on both sides of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub id: String,
    pub title: String,
    /// Ordered, the first entry is the primary artist.
    pub artists: Vec<String>,
    pub album: String,
    pub duration: Duration,
}

impl CatalogTrack {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

use std::time::Duration;

use crate::ports::CatalogTrack;
use crate::ports::source::SourcePlaylist;

pub fn track(id: &str, title: &str, artist: &str, album: &str, duration_secs: u64) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        album: album.to_string(),
        duration: Duration::from_secs(duration_secs),
    }
}

pub fn playlist(id: &str, name: &str) -> SourcePlaylist {
    SourcePlaylist {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("{} description", name)),
    }
}

use serde::Deserialize;

/// Spotify OAuth token response. Runs are short, so only the access token is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
}

/// Spotify playlist from API
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Spotify track from API
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    /// Absent for local files added to a playlist.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
}

/// One entry of a playlist's track listing; `track` is null for removed content.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistItem {
    pub track: Option<SpotifyTrack>,
}

/// Paging object wrapping every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPage<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tracks_page() {
        let json = r#"{
            "items": [
                {"track": {"id": "t1", "name": "Song A", "artists": [{"name": "Artist X"}],
                           "album": {"name": "Album"}, "duration_ms": 180000}},
                {"track": null},
                {"track": {"id": null, "name": "Local File", "artists": [],
                           "album": null, "duration_ms": 0}}
            ],
            "next": "https://api.spotify.com/v1/playlists/pl/tracks?offset=100&limit=100"
        }"#;

        let page: SpotifyPage<SpotifyPlaylistItem> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items[1].track.is_none());
        assert!(page.next.is_some());

        let first = page.items[0].track.as_ref().unwrap();
        assert_eq!(first.artists[0].name, "Artist X");
        assert_eq!(first.album.as_ref().unwrap().name, "Album");

        let local = page.items[2].track.as_ref().unwrap();
        assert!(local.id.is_none());
        assert!(local.album.is_none());
    }

    #[test]
    fn test_deserialize_token_ignores_extra_fields() {
        let json = r#"{"access_token": "at", "token_type": "Bearer", "expires_in": 3600, "scope": ""}"#;
        let token: SpotifyTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "at");
    }
}

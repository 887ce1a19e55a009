use std::time::Duration;

use crate::config::SpotifyConfig;
use crate::error::CatalogError;
use crate::ports::CatalogTrack;
use crate::ports::source::{SourceCatalog, SourcePlaylist};
use crate::services::http_client;
use crate::spotify_rs::auth::request_access_token;
use crate::spotify_rs::client::SpotifyClient;
use crate::spotify_rs::types::{SpotifyPlaylist, SpotifyTrack};

pub struct SpotifyHttpAdapter {
    client: SpotifyClient,
}

impl SpotifyHttpAdapter {
    /// Authenticate against Spotify and return a ready source catalog.
    pub async fn connect(config: &SpotifyConfig) -> Result<Self, CatalogError> {
        let http = http_client()?;
        let refresh_token = config
            .refresh_token
            .as_deref()
            .filter(|token| !token.is_empty());

        let token = request_access_token(
            &http,
            &config.client_id,
            &config.client_secret,
            refresh_token,
        )
        .await?;
        log::info!("Authenticated with Spotify");

        Ok(Self {
            client: SpotifyClient::new(http, token.access_token)?,
        })
    }
}

fn to_source_playlist(playlist: SpotifyPlaylist) -> SourcePlaylist {
    SourcePlaylist {
        id: playlist.id,
        name: playlist.name,
        description: playlist.description.filter(|d| !d.is_empty()),
    }
}

fn to_catalog_track(track: SpotifyTrack) -> CatalogTrack {
    CatalogTrack {
        id: track.id.unwrap_or_default(),
        title: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: track.album.map(|a| a.name).unwrap_or_default(),
        duration: Duration::from_millis(track.duration_ms),
    }
}

#[async_trait::async_trait]
impl SourceCatalog for SpotifyHttpAdapter {
    async fn playlist(&self, playlist_id: &str) -> Result<SourcePlaylist, CatalogError> {
        let playlist = self.client.get_playlist(playlist_id).await?;
        Ok(to_source_playlist(playlist))
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        let tracks = self.client.get_playlist_tracks(playlist_id).await?;
        Ok(tracks.into_iter().map(to_catalog_track).collect())
    }

    async fn user_playlists(&self, username: &str) -> Result<Vec<SourcePlaylist>, CatalogError> {
        let playlists = self.client.get_user_playlists(username).await?;
        Ok(playlists.into_iter().map(to_source_playlist).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_conversion() {
        let json = r#"{
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "artists": [{"name": "Rick Astley"}, {"name": "Someone Else"}],
            "album": {"name": "Whenever You Need Somebody"},
            "duration_ms": 213573
        }"#;
        let track: SpotifyTrack = serde_json::from_str(json).unwrap();

        let track = to_catalog_track(track);
        assert_eq!(track.id, "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(track.primary_artist(), Some("Rick Astley"));
        assert_eq!(track.album, "Whenever You Need Somebody");
        assert_eq!(track.duration, Duration::from_millis(213573));
    }

    #[test]
    fn test_local_file_track_conversion() {
        let json = r#"{"id": null, "name": "Demo", "artists": [], "album": null, "duration_ms": 0}"#;
        let track = to_catalog_track(serde_json::from_str(json).unwrap());
        assert_eq!(track.id, "");
        assert_eq!(track.album, "");
        assert_eq!(track.primary_artist(), None);
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let playlist = to_source_playlist(SpotifyPlaylist {
            id: "p".into(),
            name: "Mix".into(),
            description: Some(String::new()),
        });
        assert_eq!(playlist.description, None);
    }
}

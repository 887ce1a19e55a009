use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::TidalConfig;
use crate::error::CatalogError;
use crate::ports::CatalogTrack;
use crate::ports::destination::{DestinationCatalog, DestinationPlaylist, PlaylistContents};
use crate::services::http_client;
use crate::tidal_rs::TIDAL_API_URL;
use crate::tidal_rs::auth::{login_with_device_code, open_session, refresh_access_token};
use crate::tidal_rs::playlist::{
    add_tracks_to_playlist, create_playlist, delete_playlist, get_playlist_etag,
    get_user_playlists, playlists_named,
};
use crate::tidal_rs::search::search_tracks;
use crate::tidal_rs::types::{TidalSession, TidalTrack};

/// Tidal rejects larger item batches.
const ADD_TRACKS_CHUNK_SIZE: usize = 50;

pub struct TidalHttpAdapter {
    client: Client,
    base_url: Url,
    session: TidalSession,
    search_limit: u32,
}

impl TidalHttpAdapter {
    /// Log in with the configured refresh token, or through the device flow when
    /// none is configured, and open a session.
    pub async fn connect(config: &TidalConfig, search_limit: u32) -> Result<Self, CatalogError> {
        let client = http_client()?;
        let client_secret = config.client_secret.as_deref().filter(|s| !s.is_empty());

        let token = match config.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            Some(refresh_token) => {
                refresh_access_token(&client, &config.client_id, client_secret, refresh_token)
                    .await?
            }
            None => {
                let token = login_with_device_code(&client, &config.client_id, client_secret)
                    .await?;
                if let Some(refresh_token) = &token.refresh_token {
                    log::info!(
                        "Set tidal.refresh_token = \"{}\" in the config to skip this login next time",
                        refresh_token
                    );
                }
                token
            }
        };

        let base_url = Url::parse(TIDAL_API_URL)?;
        let session = open_session(&client, &base_url, token.access_token).await?;
        log::info!("Authenticated with Tidal");

        Ok(Self {
            client,
            base_url,
            session,
            search_limit,
        })
    }
}

fn to_catalog_track(track: TidalTrack) -> CatalogTrack {
    CatalogTrack {
        id: track.id.to_string(),
        title: track.full_title(),
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: track.album.map(|a| a.title).unwrap_or_default(),
        duration: Duration::from_secs(track.duration),
    }
}

/// Insertion batches for an empty playlist: each chunk goes in at the index right
/// after the previous one, so the final order equals `track_ids`.
fn add_tracks_plan(track_ids: &[String]) -> Vec<(usize, &[String])> {
    track_ids
        .chunks(ADD_TRACKS_CHUNK_SIZE)
        .enumerate()
        .map(|(chunk_index, chunk)| (chunk_index * ADD_TRACKS_CHUNK_SIZE, chunk))
        .collect()
}

#[async_trait::async_trait]
impl DestinationCatalog for TidalHttpAdapter {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        let tracks = search_tracks(
            &self.client,
            &self.base_url,
            &self.session,
            query,
            self.search_limit,
        )
        .await?;
        Ok(tracks.into_iter().map(to_catalog_track).collect())
    }

    async fn replace_playlist(
        &self,
        contents: &PlaylistContents,
    ) -> Result<DestinationPlaylist, CatalogError> {
        let existing = get_user_playlists(&self.client, &self.base_url, &self.session).await?;
        for playlist in playlists_named(&existing, &contents.name) {
            log::debug!("Deleting existing Tidal playlist {}", playlist.uuid);
            delete_playlist(&self.client, &self.base_url, &self.session, &playlist.uuid).await?;
        }

        let created = create_playlist(
            &self.client,
            &self.base_url,
            &self.session,
            &contents.name,
            &contents.description,
        )
        .await?;

        for (to_index, chunk) in add_tracks_plan(&contents.track_ids) {
            // Every modification bumps the ETag.
            let etag =
                get_playlist_etag(&self.client, &self.base_url, &self.session, &created.uuid)
                    .await?;
            add_tracks_to_playlist(
                &self.client,
                &self.base_url,
                &self.session,
                &created.uuid,
                &etag,
                chunk,
                to_index,
            )
            .await?;
        }

        Ok(DestinationPlaylist {
            id: created.uuid,
            name: created.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_conversion() {
        let json = r#"{
            "id": 77, "title": "Song", "version": "Live", "duration": 240,
            "artists": [{"name": "Band"}], "album": {"title": "Tour"}
        }"#;
        let track = to_catalog_track(serde_json::from_str(json).unwrap());

        assert_eq!(track.id, "77");
        assert_eq!(track.title, "Song (Live)");
        assert_eq!(track.artists, vec!["Band".to_string()]);
        assert_eq!(track.album, "Tour");
        assert_eq!(track.duration, Duration::from_secs(240));
    }

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| i.to_string()).collect()
    }

    fn plan_shape(track_ids: &[String]) -> Vec<(usize, usize)> {
        add_tracks_plan(track_ids)
            .into_iter()
            .map(|(to_index, chunk)| (to_index, chunk.len()))
            .collect()
    }

    #[test]
    fn test_add_tracks_plan_sizes() {
        assert!(add_tracks_plan(&[]).is_empty());
        assert_eq!(plan_shape(&ids(50)), vec![(0, 50)]);
        assert_eq!(plan_shape(&ids(51)), vec![(0, 50), (50, 1)]);
        assert_eq!(plan_shape(&ids(120)), vec![(0, 50), (50, 50), (100, 20)]);
    }

    #[test]
    fn test_add_tracks_plan_keeps_order() {
        let track_ids = ids(120);
        let flattened: Vec<String> = add_tracks_plan(&track_ids)
            .into_iter()
            .flat_map(|(to_index, chunk)| {
                assert_eq!(chunk[0], to_index.to_string());
                chunk.to_vec()
            })
            .collect();
        assert_eq!(flattened, track_ids);
    }

    #[test]
    fn test_track_without_album() {
        let track = to_catalog_track(serde_json::from_str(r#"{"id": 1, "title": "X"}"#).unwrap());
        assert_eq!(track.album, "");
        assert!(track.artists.is_empty());
    }
}

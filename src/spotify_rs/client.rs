use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::CatalogError;
use crate::spotify_rs::types::{SpotifyPage, SpotifyPlaylist, SpotifyPlaylistItem, SpotifyTrack};

const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Field filter for playlist items; keeps the pages small.
const TRACK_FIELDS: &str = "next,items(track(id,name,artists(name),album(name),duration_ms))";

/// Spotify API client
pub struct SpotifyClient {
    access_token: String,
    client: Client,
    base_url: Url,
}

impl SpotifyClient {
    pub fn new(client: Client, access_token: String) -> Result<Self, CatalogError> {
        Ok(Self {
            access_token,
            client,
            base_url: Url::parse(SPOTIFY_API_URL)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    async fn get_all_pages<T: DeserializeOwned>(&self, first: Url) -> Result<Vec<T>, CatalogError> {
        collect_pages(first, |url| self.get_json::<SpotifyPage<T>>(url)).await
    }

    /// Get a playlist's metadata
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<SpotifyPlaylist, CatalogError> {
        let mut url = self.base_url.join(&format!("playlists/{}", playlist_id))?;
        url.query_pairs_mut()
            .append_pair("fields", "id,name,description");
        self.get_json(url).await
    }

    /// Get all tracks in a playlist, skipping entries whose track was removed
    pub async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<SpotifyTrack>, CatalogError> {
        let mut url = self
            .base_url
            .join(&format!("playlists/{}/tracks", playlist_id))?;
        url.query_pairs_mut()
            .append_pair("limit", "100")
            .append_pair("additional_types", "track")
            .append_pair("fields", TRACK_FIELDS);

        let items: Vec<SpotifyPlaylistItem> = self.get_all_pages(url).await?;
        Ok(playable_tracks(items))
    }

    /// Get all public playlists of a user
    pub async fn get_user_playlists(
        &self,
        username: &str,
    ) -> Result<Vec<SpotifyPlaylist>, CatalogError> {
        let url = user_playlists_url(&self.base_url, username)?;
        self.get_all_pages(url).await
    }
}

/// Follow `next` links until the listing is exhausted.
async fn collect_pages<T, F, Fut>(first: Url, mut fetch: F) -> Result<Vec<T>, CatalogError>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<SpotifyPage<T>, CatalogError>>,
{
    let mut items = Vec::new();
    let mut next_url = Some(first);

    while let Some(url) = next_url {
        let page = fetch(url).await?;
        items.extend(page.items);
        next_url = page.next.as_deref().map(Url::parse).transpose()?;
    }

    Ok(items)
}

/// Playlist entries whose track was removed from Spotify come back as `null`.
fn playable_tracks(items: Vec<SpotifyPlaylistItem>) -> Vec<SpotifyTrack> {
    items.into_iter().filter_map(|item| item.track).collect()
}

/// The username goes in as an encoded path segment.
fn user_playlists_url(base_url: &Url, username: &str) -> Result<Url, CatalogError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| CatalogError::InvalidResponse(format!("Invalid base URL: {}", base_url)))?
        .pop_if_empty()
        .push("users")
        .push(username)
        .push("playlists");
    url.query_pairs_mut().append_pair("limit", "50");
    Ok(url)
}

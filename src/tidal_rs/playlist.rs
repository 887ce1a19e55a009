use reqwest::Client;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use url::Url;

use crate::error::CatalogError;
use crate::tidal_rs::api_url;
use crate::tidal_rs::types::{TidalPage, TidalPlaylist, TidalSession};

/// Page size used when listing the user's playlists.
const PLAYLIST_PAGE_SIZE: u32 = 50;

/* ---------- Listing ---------- */

pub async fn get_user_playlists(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
) -> Result<Vec<TidalPlaylist>, CatalogError> {
    let mut playlists = Vec::new();
    let mut offset = 0u32;

    loop {
        let mut url = api_url(
            base_url,
            &format!("users/{}/playlists", session.user_id),
            session,
        )?;
        url.query_pairs_mut()
            .append_pair("limit", &PLAYLIST_PAGE_SIZE.to_string())
            .append_pair("offset", &offset.to_string());

        let page = client
            .get(url)
            .bearer_auth(&session.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<TidalPage<TidalPlaylist>>()
            .await?;

        let fetched = page.items.len() as u32;
        playlists.extend(page.items);
        offset += fetched;

        let total = page.total_number_of_items.unwrap_or(offset);
        if fetched == 0 || offset >= total {
            break;
        }
    }

    Ok(playlists)
}

/* ---------- Create and delete ---------- */

pub async fn create_playlist(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
    title: &str,
    description: &str,
) -> Result<TidalPlaylist, CatalogError> {
    let url = api_url(
        base_url,
        &format!("users/{}/playlists", session.user_id),
        session,
    )?;

    let playlist = client
        .post(url)
        .bearer_auth(&session.access_token)
        .form(&[("title", title), ("description", description)])
        .send()
        .await?
        .error_for_status()?
        .json::<TidalPlaylist>()
        .await?;

    Ok(playlist)
}

pub async fn delete_playlist(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
    playlist_uuid: &str,
) -> Result<(), CatalogError> {
    let url = api_url(base_url, &format!("playlists/{}", playlist_uuid), session)?;

    client
        .delete(url)
        .bearer_auth(&session.access_token)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}

/* ---------- Items ---------- */

/// Playlist modifications must carry the current ETag of the playlist.
pub async fn get_playlist_etag(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
    playlist_uuid: &str,
) -> Result<String, CatalogError> {
    let url = api_url(base_url, &format!("playlists/{}", playlist_uuid), session)?;

    let res = client
        .get(url)
        .bearer_auth(&session.access_token)
        .send()
        .await?
        .error_for_status()?;

    res.headers()
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            CatalogError::InvalidResponse(format!("Playlist {} has no ETag", playlist_uuid))
        })
}

/// Insert tracks at `to_index`, keeping the given order.
pub async fn add_tracks_to_playlist(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
    playlist_uuid: &str,
    etag: &str,
    track_ids: &[String],
    to_index: usize,
) -> Result<(), CatalogError> {
    let url = api_url(
        base_url,
        &format!("playlists/{}/items", playlist_uuid),
        session,
    )?;

    let track_ids = track_ids.join(",");
    let to_index = to_index.to_string();

    client
        .post(url)
        .bearer_auth(&session.access_token)
        .header(IF_NONE_MATCH, etag)
        .form(&[
            ("trackIds", track_ids.as_str()),
            ("onDupes", "ADD"),
            ("toIndex", to_index.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}

/* ---------- Optional helpers ---------- */

/// Playlists of the user carrying `title`, compared the way Tidal displays them.
pub fn playlists_named<'a>(
    playlists: &'a [TidalPlaylist],
    title: &'a str,
) -> impl Iterator<Item = &'a TidalPlaylist> + 'a {
    playlists.iter().filter(move |p| p.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(uuid: &str, title: &str) -> TidalPlaylist {
        TidalPlaylist {
            uuid: uuid.into(),
            title: title.into(),
            number_of_tracks: None,
        }
    }

    #[test]
    fn test_playlists_named_matches_exact_title() {
        let playlists = vec![
            playlist("1", "Road Trip"),
            playlist("2", "road trip"),
            playlist("3", "Road Trip"),
        ];

        let uuids: Vec<_> = playlists_named(&playlists, "Road Trip")
            .map(|p| p.uuid.as_str())
            .collect();
        assert_eq!(uuids, vec!["1", "3"]);
    }

    #[test]
    fn test_deserialize_playlist_page() {
        let json = r#"{
            "limit": 50, "offset": 0, "totalNumberOfItems": 2,
            "items": [
                {"uuid": "a-1", "title": "Mix", "numberOfTracks": 12},
                {"uuid": "b-2", "title": "Chill"}
            ]
        }"#;
        let page: TidalPage<TidalPlaylist> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].number_of_tracks, Some(12));
        assert_eq!(page.items[1].number_of_tracks, None);
    }
}

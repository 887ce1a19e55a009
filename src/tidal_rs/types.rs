use serde::Deserialize;

/// Authenticated user context every API call is made with.
#[derive(Debug, Clone)]
pub struct TidalSession {
    pub access_token: String,
    pub user_id: u64,
    pub country_code: String,
}

/* ---------- Auth ---------- */

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalDeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    pub interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalOAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalSessionInfo {
    pub user_id: u64,
    pub country_code: String,
}

/* ---------- Catalog ---------- */

/// Envelope of every paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total_number_of_items: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalTrack {
    pub id: u64,
    pub title: String,
    /// e.g. "Remastered 2011"; shown after the title in Tidal clients.
    #[serde(default)]
    pub version: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub artists: Vec<TidalArtist>,
    #[serde(default)]
    pub album: Option<TidalAlbum>,
}

impl TidalTrack {
    pub fn full_title(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => format!("{} ({})", self.title, version),
            _ => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidalAlbum {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalPlaylist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_page() {
        let json = r#"{
            "limit": 10, "offset": 0, "totalNumberOfItems": 1,
            "items": [{
                "id": 1234, "title": "Song A", "version": "Remastered", "duration": 181,
                "artists": [{"id": 1, "name": "Artist X", "type": "MAIN"}],
                "album": {"id": 9, "title": "Album"}
            }]
        }"#;

        let page: TidalPage<TidalTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_number_of_items, Some(1));
        let track = &page.items[0];
        assert_eq!(track.id, 1234);
        assert_eq!(track.full_title(), "Song A (Remastered)");
        assert_eq!(track.album.as_ref().unwrap().title, "Album");
    }

    #[test]
    fn test_full_title_without_version() {
        let track: TidalTrack =
            serde_json::from_str(r#"{"id": 1, "title": "Song", "version": null}"#).unwrap();
        assert_eq!(track.full_title(), "Song");
    }

    #[test]
    fn test_deserialize_token_response() {
        let json = r#"{"access_token": "at", "refresh_token": "rt", "token_type": "Bearer",
                       "expires_in": 604800, "user": {"userId": 1}}"#;
        let token: TidalTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn test_deserialize_device_authorization() {
        let json = r#"{
            "deviceCode": "dc", "userCode": "ABCDE", "verificationUri": "link.tidal.com",
            "verificationUriComplete": "link.tidal.com/ABCDE", "expiresIn": 300, "interval": 2
        }"#;
        let auth: TidalDeviceAuthorization = serde_json::from_str(json).unwrap();
        assert_eq!(auth.user_code, "ABCDE");
        assert_eq!(auth.interval, 2);
    }
}

use url::Url;

use crate::error::CatalogError;
use crate::tidal_rs::types::TidalSession;

pub mod auth;
pub mod playlist;
pub mod search;
pub mod types;

pub const TIDAL_API_URL: &str = "https://api.tidal.com/v1/";

/// Every catalog endpoint is scoped to the session's country.
fn api_url(base_url: &Url, path: &str, session: &TidalSession) -> Result<Url, CatalogError> {
    let mut url = base_url.join(path)?;
    url.query_pairs_mut()
        .append_pair("countryCode", &session.country_code);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_appends_country() {
        let base = Url::parse(TIDAL_API_URL).unwrap();
        let session = TidalSession {
            access_token: "token".into(),
            user_id: 1,
            country_code: "DE".into(),
        };

        let url = api_url(&base, "playlists/abc/items", &session).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.tidal.com/v1/playlists/abc/items?countryCode=DE"
        );
    }
}

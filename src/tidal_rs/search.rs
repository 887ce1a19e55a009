use reqwest::Client;
use url::Url;

use crate::error::CatalogError;
use crate::tidal_rs::api_url;
use crate::tidal_rs::types::{TidalPage, TidalSession, TidalTrack};

pub async fn search_tracks(
    client: &Client,
    base_url: &Url,
    session: &TidalSession,
    query: &str,
    limit: u32,
) -> Result<Vec<TidalTrack>, CatalogError> {
    let mut url = api_url(base_url, "search/tracks", session)?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", "0");

    let res = client
        .get(url)
        .bearer_auth(&session.access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<TidalPage<TidalTrack>>()
        .await?;

    Ok(res.items)
}

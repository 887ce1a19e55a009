use std::time::Duration;

use reqwest::Client;

use crate::error::CatalogError;
use crate::spotify_rs::types::SpotifyTokenResponse;

const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SpotifyAuthError {
    #[error("Spotify rejected the credentials: {reason}")]
    InvalidCredentials { reason: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

impl From<SpotifyAuthError> for CatalogError {
    fn from(err: SpotifyAuthError) -> Self {
        match err {
            SpotifyAuthError::InvalidCredentials { .. } => {
                CatalogError::Authentication(err.to_string())
            }
            SpotifyAuthError::FailedToSendRequest(_) => CatalogError::Network(err.to_string()),
            SpotifyAuthError::FailedToParseResponse(_) => {
                CatalogError::InvalidResponse(err.to_string())
            }
        }
    }
}

/// Form parameters of the token request: a refresh-token grant when a refresh token
/// is available, the client-credentials grant otherwise.
fn grant_params(refresh_token: Option<&str>) -> Vec<(&'static str, String)> {
    match refresh_token {
        Some(token) => vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", token.to_string()),
        ],
        None => vec![("grant_type", "client_credentials".to_string())],
    }
}

/// Obtain an access token.
/// https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow
///
/// Client-credentials tokens can read any public playlist. Private playlists need a
/// refresh token issued to the playlist owner.
pub async fn request_access_token(
    client: &Client,
    client_id: &str,
    client_secret: &str,
    refresh_token: Option<&str>,
) -> Result<SpotifyTokenResponse, SpotifyAuthError> {
    let response = client
        .post(SPOTIFY_TOKEN_URL)
        // This automatically serializes to x-www-form-urlencoded and sets the header (as required by spotify)
        .form(&grant_params(refresh_token))
        .basic_auth(client_id, Some(client_secret))
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(SpotifyAuthError::FailedToSendRequest)?;

    if !response.status().is_success() {
        return Err(SpotifyAuthError::InvalidCredentials {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json::<SpotifyTokenResponse>()
        .await
        .map_err(SpotifyAuthError::FailedToParseResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_credentials_grant() {
        let params = grant_params(None);
        assert_eq!(params, vec![("grant_type", "client_credentials".to_string())]);
    }

    #[test]
    fn test_refresh_token_grant() {
        let params = grant_params(Some("rt"));
        assert_eq!(params[0], ("grant_type", "refresh_token".to_string()));
        assert_eq!(params[1], ("refresh_token", "rt".to_string()));
    }

    #[test]
    fn test_rejected_credentials_are_authentication_failures() {
        let err: CatalogError = SpotifyAuthError::InvalidCredentials {
            reason: "invalid_client".into(),
        }
        .into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("invalid_client"));
    }
}

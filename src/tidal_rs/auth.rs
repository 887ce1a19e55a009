use std::time::{Duration, Instant};

use reqwest::Client;
use url::Url;

use crate::error::CatalogError;
use crate::tidal_rs::types::{
    TidalDeviceAuthorization, TidalOAuthError, TidalSession, TidalSessionInfo, TidalTokenResponse,
};

const TIDAL_AUTH_URL: &str = "https://auth.tidal.com/v1/oauth2/";
const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const SCOPE: &str = "r_usr w_usr w_sub";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum TidalAuthError {
    #[error("Tidal rejected the login: {reason}")]
    Rejected { reason: String },
    #[error("Device login was not completed in time")]
    DeviceCodeExpired,
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

impl From<TidalAuthError> for CatalogError {
    fn from(err: TidalAuthError) -> Self {
        match err {
            TidalAuthError::Rejected { .. } | TidalAuthError::DeviceCodeExpired => {
                CatalogError::Authentication(err.to_string())
            }
            TidalAuthError::FailedToSendRequest(_) => CatalogError::Network(err.to_string()),
            TidalAuthError::FailedToParseResponse(_) => {
                CatalogError::InvalidResponse(err.to_string())
            }
        }
    }
}

/// Outcome of one poll of the token endpoint during device login.
#[derive(Debug)]
pub enum DevicePoll {
    Pending,
    Complete(TidalTokenResponse),
}

fn client_params<'a>(
    client_id: &'a str,
    client_secret: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![("client_id", client_id), ("scope", SCOPE)];
    if let Some(secret) = client_secret {
        params.push(("client_secret", secret));
    }
    params
}

/// Interpret a failed token response body while the user has not finished logging in.
fn classify_poll_error(body: &str) -> Result<DevicePoll, TidalAuthError> {
    match serde_json::from_str::<TidalOAuthError>(body) {
        Ok(error) if error.error == "authorization_pending" => Ok(DevicePoll::Pending),
        Ok(error) if error.error == "expired_token" => Err(TidalAuthError::DeviceCodeExpired),
        Ok(error) => Err(TidalAuthError::Rejected {
            reason: error.error_description.unwrap_or(error.error),
        }),
        Err(_) => Err(TidalAuthError::Rejected {
            reason: body.to_string(),
        }),
    }
}

async fn post_form(
    client: &Client,
    path: &str,
    params: &[(&str, &str)],
) -> Result<reqwest::Response, TidalAuthError> {
    let url = format!("{}{}", TIDAL_AUTH_URL, path);
    client
        .post(url)
        .form(params)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(TidalAuthError::FailedToSendRequest)
}

/// Start the OAuth device flow. The user has to open the returned verification link.
pub async fn start_device_authorization(
    client: &Client,
    client_id: &str,
) -> Result<TidalDeviceAuthorization, TidalAuthError> {
    let params = client_params(client_id, None);
    let response = post_form(client, "device_authorization", &params).await?;

    if !response.status().is_success() {
        return Err(TidalAuthError::Rejected {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json::<TidalDeviceAuthorization>()
        .await
        .map_err(TidalAuthError::FailedToParseResponse)
}

pub async fn poll_device_token(
    client: &Client,
    client_id: &str,
    client_secret: Option<&str>,
    device_code: &str,
) -> Result<DevicePoll, TidalAuthError> {
    let mut params = client_params(client_id, client_secret);
    params.push(("device_code", device_code));
    params.push(("grant_type", DEVICE_CODE_GRANT));

    let response = post_form(client, "token", &params).await?;

    if response.status().is_success() {
        let token = response
            .json::<TidalTokenResponse>()
            .await
            .map_err(TidalAuthError::FailedToParseResponse)?;
        return Ok(DevicePoll::Complete(token));
    }

    let body = response
        .text()
        .await
        .map_err(TidalAuthError::FailedToParseResponse)?;
    classify_poll_error(&body)
}

/// Run the whole device login: print the link, then poll at the advertised interval
/// until the user confirms or the code expires.
pub async fn login_with_device_code(
    client: &Client,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<TidalTokenResponse, TidalAuthError> {
    let authorization = start_device_authorization(client, client_id).await?;
    let link = authorization
        .verification_uri_complete
        .as_deref()
        .unwrap_or(authorization.verification_uri.as_str());

    println!(
        "Log in to Tidal: visit https://{} (code {}), expires in {}s",
        link.trim_start_matches("https://"),
        authorization.user_code,
        authorization.expires_in
    );

    let deadline = Instant::now() + Duration::from_secs(authorization.expires_in);
    let interval = Duration::from_secs(authorization.interval.max(1));

    while Instant::now() < deadline {
        tokio::time::sleep(interval).await;
        match poll_device_token(client, client_id, client_secret, &authorization.device_code)
            .await?
        {
            DevicePoll::Pending => log::debug!("Waiting for Tidal device login"),
            DevicePoll::Complete(token) => {
                log::info!("Tidal device login completed");
                return Ok(token);
            }
        }
    }

    Err(TidalAuthError::DeviceCodeExpired)
}

pub async fn refresh_access_token(
    client: &Client,
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<TidalTokenResponse, TidalAuthError> {
    let mut params = client_params(client_id, client_secret);
    params.push(("refresh_token", refresh_token));
    params.push(("grant_type", "refresh_token"));

    let response = post_form(client, "token", &params).await?;

    if !response.status().is_success() {
        return Err(TidalAuthError::Rejected {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json::<TidalTokenResponse>()
        .await
        .map_err(TidalAuthError::FailedToParseResponse)
}

/// Resolve the user and country the token belongs to.
pub async fn open_session(
    client: &Client,
    base_url: &Url,
    access_token: String,
) -> Result<TidalSession, CatalogError> {
    let url = base_url.join("sessions")?;

    let info = client
        .get(url)
        .bearer_auth(&access_token)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json::<TidalSessionInfo>()
        .await?;

    log::debug!(
        "Tidal session for user {} ({})",
        info.user_id,
        info.country_code
    );

    Ok(TidalSession {
        access_token,
        user_id: info.user_id,
        country_code: info.country_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_poll() {
        let body = r#"{"status":400,"error":"authorization_pending","sub_status":1002,
                       "error_description":"Device Authorization code is not authorized yet"}"#;
        assert!(matches!(classify_poll_error(body), Ok(DevicePoll::Pending)));
    }

    #[test]
    fn test_expired_poll() {
        let body = r#"{"status":400,"error":"expired_token"}"#;
        assert!(matches!(
            classify_poll_error(body),
            Err(TidalAuthError::DeviceCodeExpired)
        ));
    }

    #[test]
    fn test_denied_poll_is_authentication_failure() {
        let body = r#"{"error":"access_denied","error_description":"User denied access"}"#;
        let err = classify_poll_error(body).unwrap_err();
        assert!(err.to_string().contains("User denied access"));

        let err: CatalogError = err.into();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unparseable_poll_body() {
        assert!(matches!(
            classify_poll_error("<html>bad gateway</html>"),
            Err(TidalAuthError::Rejected { .. })
        ));
    }

    #[test]
    fn test_client_params_include_secret_when_present() {
        assert_eq!(client_params("id", None).len(), 2);
        let params = client_params("id", Some("secret"));
        assert!(params.contains(&("client_secret", "secret")));
    }
}

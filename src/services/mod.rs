use std::time::Duration;

use reqwest::Client;

use crate::error::CatalogError;

pub mod matching;
pub mod spotify;
pub mod sync;
pub mod tidal;

/// Per-request timeout of every catalog HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the catalog adapters.
pub fn http_client() -> Result<Client, CatalogError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| CatalogError::Network(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(30));
    }
}

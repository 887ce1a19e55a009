use reqwest::StatusCode;

/// Errors surfaced by the catalog adapters.
///
/// `Authentication` aborts the whole run. Every other variant only fails the
/// playlist that was being synced.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Network request failed: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CatalogError::Authentication(_))
    }

    /// Classify an HTTP status returned by a catalog endpoint.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CatalogError::Authentication(format!("HTTP {} - {}", status, body))
            }
            StatusCode::NOT_FOUND => CatalogError::NotFound(format!("HTTP {} - {}", status, body)),
            _ => CatalogError::Network(format!("HTTP {} - {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::InvalidResponse(err.to_string());
        }
        match err.status() {
            Some(status) => CatalogError::from_status(status, &err.to_string()),
            None => CatalogError::Network(err.to_string()),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::InvalidResponse(format!("URL parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status_is_fatal() {
        let err = CatalogError::from_status(StatusCode::UNAUTHORIZED, "expired token");
        assert!(matches!(err, CatalogError::Authentication(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_server_error_is_network_failure() {
        let err = CatalogError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, CatalogError::Network(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_not_found_status() {
        let err = CatalogError::from_status(StatusCode::NOT_FOUND, "no playlist");
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(err.to_string().contains("no playlist"));
    }
}

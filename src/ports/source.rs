use crate::error::CatalogError;
use crate::ports::CatalogTrack;

/// Decoupled representation of a playlist in the source catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Port trait wrapping the source catalog capabilities used by the sync driver.
///
/// Implementations live in `services::spotify::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SourceCatalog: Send + Sync {
    async fn playlist(&self, playlist_id: &str) -> Result<SourcePlaylist, CatalogError>;

    /// All tracks of a playlist, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CatalogTrack>, CatalogError>;

    async fn user_playlists(&self, username: &str) -> Result<Vec<SourcePlaylist>, CatalogError>;
}

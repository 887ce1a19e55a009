use crate::error::CatalogError;
use crate::ports::CatalogTrack;

/// The desired state of a destination playlist after a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistContents {
    pub name: String,
    pub description: String,
    /// Destination track identifiers, in playlist order.
    pub track_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlaylist {
    pub id: String,
    pub name: String,
}

/// Port trait wrapping the destination catalog capabilities used by the sync driver.
///
/// Implementations live in `services::tidal::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DestinationCatalog: Send + Sync {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError>;

    /// Create the playlist, or replace an existing one with the same name, so that it
    /// holds exactly `contents.track_ids` in order.
    async fn replace_playlist(
        &self,
        contents: &PlaylistContents,
    ) -> Result<DestinationPlaylist, CatalogError>;
}

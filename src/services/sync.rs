use crate::config::Config;
use crate::error::CatalogError;
use crate::ports::CatalogTrack;
use crate::ports::destination::{DestinationCatalog, PlaylistContents};
use crate::ports::source::SourceCatalog;
use crate::services::matching::TrackMatcher;
use crate::spotify_rs::parse_playlist_id;

/// A source track that had no acceptable destination candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTrack {
    /// 1-based position in the source playlist.
    pub position: usize,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSyncResult {
    pub source_id: String,
    pub name: String,
    pub destination_playlist_id: String,
    pub total: usize,
    pub matched: usize,
    pub missing: Vec<MissingTrack>,
}

#[derive(Debug)]
pub struct FailedPlaylist {
    pub playlist_id: String,
    pub error: CatalogError,
}

#[derive(Debug, Default)]
pub struct SyncSummary {
    pub synced: Vec<PlaylistSyncResult>,
    pub failed: Vec<FailedPlaylist>,
}

impl SyncSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Copies source playlists into the destination catalog, one playlist and one
/// track at a time.
pub struct PlaylistSyncService<S: SourceCatalog, D: DestinationCatalog> {
    source: S,
    destination: D,
    matcher: TrackMatcher,
}

impl<S: SourceCatalog, D: DestinationCatalog> PlaylistSyncService<S, D> {
    pub fn new(source: S, destination: D, matcher: TrackMatcher) -> Self {
        Self {
            source,
            destination,
            matcher,
        }
    }

    /// Sync every playlist in order.
    ///
    /// An authentication failure aborts the run. Any other failure is recorded in the
    /// summary and the next playlist is synced.
    pub async fn sync_playlists(
        &self,
        playlist_ids: &[String],
    ) -> Result<SyncSummary, CatalogError> {
        let mut summary = SyncSummary::default();
        let total = playlist_ids.len();

        for (index, playlist_id) in playlist_ids.iter().enumerate() {
            match self.sync_one(playlist_id, index + 1, total).await {
                Ok(result) => summary.synced.push(result),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    log::error!("Failed to sync playlist {}: {}", playlist_id, error);
                    summary.failed.push(FailedPlaylist {
                        playlist_id: playlist_id.clone(),
                        error,
                    });
                }
            }
        }

        Ok(summary)
    }

    async fn sync_one(
        &self,
        playlist_id: &str,
        index: usize,
        total: usize,
    ) -> Result<PlaylistSyncResult, CatalogError> {
        let playlist = self.source.playlist(playlist_id).await?;
        log::info!("Syncing playlist ({}/{}): {}", index, total, playlist.name);

        let tracks = self.source.playlist_tracks(playlist_id).await?;
        let mut track_ids = Vec::with_capacity(tracks.len());
        let mut missing = Vec::new();

        for (position, track) in tracks.iter().enumerate() {
            match self.matcher.find_match(&self.destination, track).await? {
                Some(found) => {
                    log::debug!("Matched '{}' to {}", track.title, found.id);
                    track_ids.push(found.id);
                }
                None => {
                    let missing_track = missing_track(position + 1, track);
                    log::warn!(
                        "No match for track {} of '{}': {} - {}",
                        missing_track.position,
                        playlist.name,
                        missing_track.artist,
                        missing_track.title
                    );
                    missing.push(missing_track);
                }
            }
        }

        let matched = track_ids.len();
        let contents = PlaylistContents {
            name: playlist.name.clone(),
            description: playlist.description.clone().unwrap_or_default(),
            track_ids,
        };
        let destination = self.destination.replace_playlist(&contents).await?;

        log::info!(
            "Synced '{}': {}/{} tracks matched",
            playlist.name,
            matched,
            tracks.len()
        );

        Ok(PlaylistSyncResult {
            source_id: playlist.id,
            name: playlist.name,
            destination_playlist_id: destination.id,
            total: tracks.len(),
            matched,
            missing,
        })
    }
}

/// Source playlist IDs selected by the configuration.
///
/// With `sync_all` and a username, every public playlist of that user is selected.
/// Otherwise the configured IDs, links or URIs are used.
pub async fn resolve_playlist_ids<S>(
    source: &S,
    config: &Config,
) -> Result<Vec<String>, CatalogError>
where
    S: SourceCatalog + ?Sized,
{
    let username = config
        .spotify
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match (config.sync_all, username) {
        (true, Some(username)) => {
            let playlists = source.user_playlists(username).await?;
            log::info!("Found {} playlists of user {}", playlists.len(), username);
            Ok(playlists.into_iter().map(|p| p.id).collect())
        }
        (sync_all, _) => {
            if sync_all {
                log::warn!("sync_all is set but spotify.username is empty, using sync_playlists");
            }
            Ok(config
                .sync_playlists
                .iter()
                .map(|id| parse_playlist_id(id))
                .filter(|id| !id.is_empty())
                .collect())
        }
    }
}

fn missing_track(position: usize, track: &CatalogTrack) -> MissingTrack {
    MissingTrack {
        position,
        title: track.title.clone(),
        artist: track.primary_artist().unwrap_or_default().to_string(),
    }
}

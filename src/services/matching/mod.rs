//! Reconciles a source track with candidates from the destination catalog.
//!
//! Both catalogs spell the same recording differently ("Song - Remastered 2011",
//! "Song (feat. X)", accented artist names), so every comparison runs on
//! simplified strings. A candidate is accepted when its weighted title/artist score
//! clears the threshold and at least three of title, artist, duration and album agree.
//! The best accepted candidate is then picked with duration and album as tie-breakers.

pub mod normalize;

use std::cmp::Ordering;
use std::time::Duration;

use crate::config::MatchingConfig;
use crate::error::CatalogError;
use crate::ports::CatalogTrack;
use crate::ports::destination::DestinationCatalog;

use normalize::{combined_similarity, jaro_winkler_similarity, simplify, token_similarity};

/// How one candidate compares against the source track.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub title_similarity: f64,
    pub artist_similarity: f64,
    /// Weighted combination of title and artist similarity, 0.0 to 1.0
    pub score: f64,
    /// Simplified title and primary artist are identical.
    pub exact: bool,
    pub duration_diff: Duration,
    pub within_duration_tolerance: bool,
    pub title_match: bool,
    pub artist_match: bool,
    pub album_match: bool,
}

/// Fields of a non-exact candidate that have to agree with the source.
const REQUIRED_AGREEING_FIELDS: usize = 3;

impl MatchScore {
    /// Number of fields (title, artist, duration, album) agreeing with the source.
    pub fn agreeing_fields(&self) -> usize {
        [
            self.title_match,
            self.artist_match,
            self.within_duration_tolerance,
            self.album_match,
        ]
        .into_iter()
        .filter(|agrees| *agrees)
        .count()
    }
}

/// Source track metadata simplified once, then compared against every candidate.
struct PreparedTrack {
    title: String,
    primary_artist: String,
    artists: String,
    album: String,
    duration: Duration,
}

impl PreparedTrack {
    fn new(track: &CatalogTrack) -> Self {
        Self {
            title: simplify(&track.title),
            primary_artist: track.primary_artist().map(simplify).unwrap_or_default(),
            artists: simplify(&track.artists.join(" ")),
            album: simplify(&track.album),
            duration: track.duration,
        }
    }
}

pub struct TrackMatcher {
    settings: MatchingConfig,
}

impl TrackMatcher {
    pub fn new(settings: MatchingConfig) -> Self {
        Self { settings }
    }

    /// Search query for a source track: primary artist followed by title.
    pub fn build_query(&self, track: &CatalogTrack) -> String {
        let artist = track.primary_artist().map(simplify).unwrap_or_default();
        format!("{} {}", artist, simplify(&track.title))
            .trim()
            .to_string()
    }

    /// Search the destination catalog and return the best candidate, if any clears
    /// the threshold.
    pub async fn find_match<D>(
        &self,
        destination: &D,
        track: &CatalogTrack,
    ) -> Result<Option<CatalogTrack>, CatalogError>
    where
        D: DestinationCatalog + ?Sized,
    {
        let query = self.build_query(track);
        if query.is_empty() {
            log::debug!("Track has no searchable metadata: {:?}", track);
            return Ok(None);
        }

        let candidates = destination.search_tracks(&query).await?;
        log::debug!("Query '{}' returned {} candidates", query, candidates.len());

        Ok(self.select_best(track, &candidates).cloned())
    }

    pub fn score(&self, source: &CatalogTrack, candidate: &CatalogTrack) -> MatchScore {
        self.score_prepared(&PreparedTrack::new(source), candidate)
    }

    /// Pick the best candidate for `source`.
    ///
    /// Accepted candidates whose score is within `tie_margin` of the best score form
    /// the tie group (only exact candidates when there are any). The group is then
    /// ranked by duration tolerance, album, duration difference and raw score. Only a
    /// full tie falls back to search order, where the earlier candidate wins.
    pub fn select_best<'a>(
        &self,
        source: &CatalogTrack,
        candidates: &'a [CatalogTrack],
    ) -> Option<&'a CatalogTrack> {
        let prepared = PreparedTrack::new(source);

        let accepted: Vec<(&CatalogTrack, MatchScore)> = candidates
            .iter()
            .filter(|candidate| !candidate.id.is_empty())
            .map(|candidate| (candidate, self.score_prepared(&prepared, candidate)))
            .filter(|(candidate, score)| {
                let accepted = self.accepts(score);
                if !accepted {
                    log::trace!(
                        "Rejected '{}' for '{}' (score {:.3}, {} agreeing fields)",
                        candidate.title,
                        source.title,
                        score.score,
                        score.agreeing_fields()
                    );
                }
                accepted
            })
            .collect();

        let any_exact = accepted.iter().any(|(_, score)| score.exact);
        let group: Vec<&(&CatalogTrack, MatchScore)> = accepted
            .iter()
            .filter(|(_, score)| score.exact || !any_exact)
            .collect();
        let top_score = group
            .iter()
            .map(|(_, score)| score.score)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut best: Option<&(&CatalogTrack, MatchScore)> = None;
        for entry in group
            .into_iter()
            .filter(|(_, score)| top_score - score.score <= self.settings.tie_margin)
        {
            let replace = match best {
                Some((_, current)) => rank(&entry.1, current) == Ordering::Greater,
                None => true,
            };
            if replace {
                best = Some(entry);
            }
        }

        best.map(|(candidate, score)| {
            log::debug!(
                "Matched '{}' to '{}' (id {}, score {:.3}, exact {})",
                source.title,
                candidate.title,
                candidate.id,
                score.score,
                score.exact
            );
            *candidate
        })
    }

    /// Exact candidates are always accepted. Others need the minimum score and
    /// enough agreeing fields.
    fn accepts(&self, score: &MatchScore) -> bool {
        score.exact
            || (score.score >= self.settings.min_score
                && score.agreeing_fields() >= REQUIRED_AGREEING_FIELDS)
    }

    fn score_prepared(&self, source: &PreparedTrack, candidate: &CatalogTrack) -> MatchScore {
        let title = simplify(&candidate.title);
        let candidate_artists: Vec<String> = candidate.artists.iter().map(|a| simplify(a)).collect();
        let candidate_primary = candidate_artists.first().cloned().unwrap_or_default();

        let title_similarity = combined_similarity(&source.title, &title);
        let artist_similarity = self.artist_similarity(source, &candidate_artists);

        let exact = !source.title.is_empty()
            && !source.primary_artist.is_empty()
            && source.title == title
            && source.primary_artist == candidate_primary;

        let score = if exact {
            1.0
        } else {
            let total_weight = self.settings.title_weight + self.settings.artist_weight;
            (self.settings.title_weight * title_similarity
                + self.settings.artist_weight * artist_similarity)
                / total_weight
        };

        let title_match = title_similarity >= self.settings.title_threshold;
        let artist_match = artist_similarity >= self.settings.artist_threshold;
        let duration_diff = source.duration.abs_diff(candidate.duration);
        let album_match = !source.album.is_empty()
            && combined_similarity(&source.album, &simplify(&candidate.album))
                >= self.settings.album_threshold;

        MatchScore {
            title_similarity,
            artist_similarity,
            score,
            exact,
            duration_diff,
            within_duration_tolerance: duration_diff <= self.settings.duration_tolerance(),
            title_match,
            artist_match,
            album_match,
        }
    }

    fn artist_similarity(&self, source: &PreparedTrack, candidate_artists: &[String]) -> f64 {
        let primary_best = candidate_artists
            .iter()
            .map(|artist| jaro_winkler_similarity(&source.primary_artist, artist))
            .fold(0.0_f64, f64::max);

        let all_tokens = token_similarity(&source.artists, &candidate_artists.join(" "));

        primary_best.max(all_tokens * 0.95)
    }
}

/// Total order on candidates of one tie group, `Greater` meaning `a` is the better match.
fn rank(a: &MatchScore, b: &MatchScore) -> Ordering {
    a.within_duration_tolerance
        .cmp(&b.within_duration_tolerance)
        .then_with(|| a.album_match.cmp(&b.album_match))
        .then_with(|| b.duration_diff.cmp(&a.duration_diff))
        .then_with(|| a.score.total_cmp(&b.score))
}

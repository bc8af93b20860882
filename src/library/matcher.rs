//! Resolve scan results to catalog movies.
//!
//! The catalog is consulted first. Only when no existing movie scores at
//! least [`EXISTING_MATCH_THRESHOLD`] does the matcher search the metadata
//! provider and create a new movie from the top candidate.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogRepository, Movie};
use crate::metadata::{MetadataProvider, MovieCandidate};
use crate::scanner::ScanResult;

use super::scoring::{existing_score, remote_confidence, EXISTING_MATCH_THRESHOLD};
use super::types::{MatchError, MatchResult, MatchType};

/// Maximum number of catalog movies scored per scan result.
pub const EXISTING_CANDIDATE_LIMIT: u32 = 10;

/// Matches scan results against the catalog and the metadata provider.
///
/// Holds no mutable state; share it freely behind an `Arc`.
pub struct Matcher {
    repo: Arc<dyn CatalogRepository>,
    provider: Arc<dyn MetadataProvider>,
}

impl Matcher {
    pub fn new(repo: Arc<dyn CatalogRepository>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { repo, provider }
    }

    /// Match one scan result. Every outcome, including failures, is encoded
    /// in the returned [`MatchResult`].
    pub async fn match_file(&self, scan: ScanResult) -> MatchResult {
        if let Some((movie, score)) = self.find_existing(&scan).await {
            debug!(
                path = %scan.path.display(),
                movie_id = %movie.id,
                score,
                "Matched existing movie"
            );
            return MatchResult::matched(scan, movie, MatchType::Title, score);
        }

        if scan.parsed_title.is_empty() {
            let reason = scan
                .parse_error
                .clone()
                .unwrap_or_else(|| scan.file_name.clone());
            return MatchResult::unmatched(scan, MatchError::NoTitle(reason));
        }

        let candidates = match self
            .provider
            .search_movies(&scan.parsed_title, scan.parsed_year)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(title = %scan.parsed_title, "Metadata search failed: {:#}", e);
                return MatchResult::unmatched(scan, MatchError::Search(format!("{e:#}")));
            }
        };

        let Some(candidate) = candidates.into_iter().next() else {
            let title = scan.parsed_title.clone();
            return MatchResult::unmatched(scan, MatchError::NoResults(title));
        };

        let confidence = remote_confidence(&scan, &candidate);

        match self.resolve_candidate(candidate).await {
            Ok((movie, created)) => {
                let mut result = MatchResult::matched(scan, movie, MatchType::Title, confidence);
                result.created_new_movie = created;
                result
            }
            Err(e) => MatchResult::unmatched(scan, MatchError::Create(e.to_string())),
        }
    }

    /// Match every scan result in order. One failure never stops the rest.
    pub async fn match_files(&self, scans: Vec<ScanResult>) -> Vec<MatchResult> {
        let mut results = Vec::with_capacity(scans.len());
        for scan in scans {
            results.push(self.match_file(scan).await);
        }
        results
    }

    /// Best-scoring catalog movie for the parsed title, if it clears the threshold.
    async fn find_existing(&self, scan: &ScanResult) -> Option<(Movie, f64)> {
        if scan.parsed_title.is_empty() {
            return None;
        }

        let movies = match self
            .repo
            .search_movies_by_title(&scan.parsed_title, EXISTING_CANDIDATE_LIMIT)
            .await
        {
            Ok(movies) => movies,
            Err(e) => {
                warn!(title = %scan.parsed_title, "Catalog title search failed: {}", e);
                return None;
            }
        };

        movies
            .into_iter()
            .map(|movie| {
                let score = existing_score(scan, &movie);
                (movie, score)
            })
            .fold(None, |best: Option<(Movie, f64)>, (movie, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((movie, score)),
            })
            .filter(|(_, score)| *score >= EXISTING_MATCH_THRESHOLD)
    }

    /// Turn a remote candidate into a catalog movie. Returns the movie and
    /// whether it was newly created.
    async fn resolve_candidate(
        &self,
        mut candidate: MovieCandidate,
    ) -> cinesync_common::Result<(Movie, bool)> {
        // Another file (or Radarr) may already have brought this movie in.
        if let Some(existing) = self.repo.get_movie_by_tmdb_id(candidate.tmdb_id).await? {
            debug!(
                tmdb_id = candidate.tmdb_id,
                movie_id = %existing.id,
                "Reusing movie with same TMDB id"
            );
            return Ok((existing, false));
        }

        if let Err(e) = self.provider.enrich_movie(&mut candidate).await {
            debug!(tmdb_id = candidate.tmdb_id, "Enrichment failed, using search data: {:#}", e);
        }

        let movie = self.repo.create_movie(&candidate.to_new_movie()).await?;
        info!(
            movie_id = %movie.id,
            tmdb_id = candidate.tmdb_id,
            title = %movie.title,
            "Created movie from {}",
            self.provider.name()
        );

        self.persist_credits(&movie, candidate.tmdb_id).await;
        self.persist_genres(&movie, candidate.tmdb_id).await;

        Ok((movie, true))
    }

    async fn persist_credits(&self, movie: &Movie, tmdb_id: i64) {
        let credits = match self.provider.get_credits(movie.id, tmdb_id).await {
            Ok(credits) => credits,
            Err(e) => {
                debug!(movie_id = %movie.id, "Fetching credits failed: {:#}", e);
                return;
            }
        };

        for credit in &credits {
            if let Err(e) = self.repo.create_credit(credit).await {
                debug!(movie_id = %movie.id, person = %credit.name, "Skipping credit: {}", e);
            }
        }
    }

    async fn persist_genres(&self, movie: &Movie, tmdb_id: i64) {
        let genres = match self.provider.get_genres(movie.id, tmdb_id).await {
            Ok(genres) => genres,
            Err(e) => {
                debug!(movie_id = %movie.id, "Fetching genres failed: {:#}", e);
                return;
            }
        };

        for genre in &genres {
            if let Err(e) = self
                .repo
                .add_movie_genre(movie.id, genre.tmdb_genre_id, &genre.name)
                .await
            {
                debug!(movie_id = %movie.id, genre = %genre.name, "Skipping genre: {}", e);
            }
        }
    }
}

//! Trait definition and types for remote metadata providers.
//!
//! The matcher consults a [`MetadataProvider`] when a scanned file does not
//! match anything already in the catalog. Providers return candidates, fill
//! in details on request, and supply credits and genres for a movie once it
//! has been created locally.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use cinesync_common::MovieId;
use serde::{Deserialize, Serialize};

use crate::catalog::{Genre, NewCredit, NewMovie};

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A movie returned by a remote search, before it exists in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieCandidate {
    /// Remote catalog (TMDB) identifier.
    pub tmdb_id: i64,
    pub imdb_id: Option<String>,
    /// Localised title.
    pub title: String,
    /// Original-language title, if the provider reports one.
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes.
    pub runtime: Option<i32>,
    pub status: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
}

impl MovieCandidate {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// Catalog values for creating this candidate as a new movie.
    pub fn to_new_movie(&self) -> NewMovie {
        NewMovie {
            title: self.title.clone(),
            original_title: self.original_title.clone(),
            year: self.release_year(),
            release_date: self.release_date,
            runtime: self.runtime,
            overview: self.overview.clone(),
            tagline: self.tagline.clone(),
            status: self.status.clone(),
            original_language: self.original_language.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            trailer_url: None,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            tmdb_id: Some(self.tmdb_id),
            imdb_id: self.imdb_id.clone(),
            radarr_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait implemented by remote metadata backends.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has credentials and can serve requests.
    fn is_available(&self) -> bool;

    /// Search for movies matching `title`, optionally constrained by `year`.
    ///
    /// Results are in the provider's relevance order; callers treat the first
    /// entry as the best candidate.
    async fn search_movies(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<MovieCandidate>>;

    /// Fill in details a search result lacks (runtime, tagline, IMDb ID, ...).
    ///
    /// Mutates `candidate` in place. Partial enrichment is acceptable.
    async fn enrich_movie(&self, candidate: &mut MovieCandidate) -> anyhow::Result<()>;

    /// Cast and crew for the remote movie `tmdb_id`, addressed to the local `movie_id`.
    async fn get_credits(&self, movie_id: MovieId, tmdb_id: i64)
        -> anyhow::Result<Vec<NewCredit>>;

    /// Genres for the remote movie `tmdb_id`, addressed to the local `movie_id`.
    async fn get_genres(&self, movie_id: MovieId, tmdb_id: i64) -> anyhow::Result<Vec<Genre>>;
}

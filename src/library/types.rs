use serde::Serialize;

use crate::catalog::Movie;
use crate::error::ItemFailure;
use crate::scanner::ScanResult;

/// How a scan result was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// A file record already existed at the path.
    Exact,
    /// Matched by title (and year) against the catalog or remote search.
    Title,
    Fuzzy,
    Manual,
    Unmatched,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchType::Exact => "exact",
            MatchType::Title => "title",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Manual => "manual",
            MatchType::Unmatched => "unmatched",
        };
        f.write_str(s)
    }
}

/// Why a scan result could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum MatchError {
    #[error("no title to search for: {0}")]
    NoTitle(String),

    #[error("metadata search failed: {0}")]
    Search(String),

    #[error("no metadata results for {0:?}")]
    NoResults(String),

    #[error("failed to create movie: {0}")]
    Create(String),
}

/// The outcome of matching one scan result.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub scan_result: ScanResult,
    pub movie: Option<Movie>,
    pub match_type: MatchType,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub error: Option<MatchError>,
    pub created_new_movie: bool,
}

impl MatchResult {
    pub fn unmatched(scan_result: ScanResult, error: MatchError) -> Self {
        Self {
            scan_result,
            movie: None,
            match_type: MatchType::Unmatched,
            confidence: 0.0,
            error: Some(error),
            created_new_movie: false,
        }
    }

    pub fn matched(
        scan_result: ScanResult,
        movie: Movie,
        match_type: MatchType,
        confidence: f64,
    ) -> Self {
        Self {
            scan_result,
            movie: Some(movie),
            match_type,
            confidence,
            error: None,
            created_new_movie: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.movie.is_some()
    }
}

/// Totals for one library reconciliation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub total_files: usize,
    pub matched_files: usize,
    pub unmatched_files: usize,
    pub new_movies: usize,
    pub existing_movies: usize,
    pub errors: Vec<ItemFailure>,
}

//! Confidence scoring for filename-to-movie matches.
//!
//! All scores are additive and land in `[0, 1]`. They break ties among a
//! handful of candidates; they are not meant to rank a large corpus.

use crate::catalog::Movie;
use crate::metadata::MovieCandidate;
use crate::scanner::ScanResult;

/// Minimum score for accepting an existing catalog movie.
pub const EXISTING_MATCH_THRESHOLD: f64 = 0.8;

/// Case-insensitive normalized Levenshtein similarity.
///
/// `1 - distance / max_len`, and `1.0` for two empty strings.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// `1.0` for the same year, `0.5` one year apart, `0.0` otherwise or when
/// either side is unknown.
pub fn year_match(parsed: Option<i32>, candidate: Option<i32>) -> f64 {
    match (parsed, candidate) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if (a - b).abs() == 1 => 0.5,
        _ => 0.0,
    }
}

/// Score of an existing catalog movie against a scan result.
pub fn existing_score(scan: &ScanResult, movie: &Movie) -> f64 {
    title_similarity(&scan.parsed_title, &movie.title) * 0.6
        + year_match(scan.parsed_year, movie.year) * 0.4
}

/// Confidence in a remote search candidate for a scan result.
pub fn remote_confidence(scan: &ScanResult, candidate: &MovieCandidate) -> f64 {
    let title_sim = title_similarity(&scan.parsed_title, &candidate.title);
    let mut confidence = title_sim * 0.5;

    if let Some(original) = candidate.original_title.as_deref() {
        if title_similarity(&scan.parsed_title, original) > title_sim {
            confidence += 0.1;
        }
    }

    let release_year = candidate.release_year();
    match scan.parsed_year {
        Some(_) => confidence += year_match(scan.parsed_year, release_year) * 0.3,
        None if release_year.is_some() => confidence -= 0.05,
        None => {}
    }

    if let Some(popularity) = candidate.popularity {
        if popularity > 100.0 {
            confidence += 0.1;
        } else if popularity > 50.0 {
            confidence += 0.05;
        }
    }

    confidence.clamp(0.0, 1.0)
}

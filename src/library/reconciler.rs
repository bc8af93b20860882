//! Library reconciliation: scanner → matcher → catalog.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogRepository, Movie, NewMovieFile};
use crate::error::{Error, ItemFailure, Result};
use crate::scanner::{FileProber, ScanResult, Scanner};

use super::matcher::Matcher;
use super::types::{MatchResult, MatchType, ScanSummary};

/// Runs full library passes and on-demand single-file matches.
pub struct LibraryReconciler {
    scanner: Arc<dyn Scanner>,
    matcher: Arc<Matcher>,
    repo: Arc<dyn CatalogRepository>,
    prober: Arc<dyn FileProber>,
}

impl LibraryReconciler {
    pub fn new(
        scanner: Arc<dyn Scanner>,
        matcher: Arc<Matcher>,
        repo: Arc<dyn CatalogRepository>,
        prober: Arc<dyn FileProber>,
    ) -> Self {
        Self {
            scanner,
            matcher,
            repo,
            prober,
        }
    }

    /// Scan the library, match every file and record files of newly
    /// created movies.
    ///
    /// Only a scanner failure or cancellation fails the run. Per-file
    /// problems end up in [`ScanSummary::errors`].
    pub async fn scan_library(&self, cancel: &CancellationToken) -> Result<ScanSummary> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        info!("Starting library scan");
        let scanner = Arc::clone(&self.scanner);
        let token = cancel.clone();
        let scanned = tokio::task::spawn_blocking(move || scanner.scan(&token))
            .await
            .map_err(|e| Error::scan(format!("scanner task failed: {e}")))?;
        let scans = match scanned {
            Ok(scans) => scans,
            Err(_) if cancel.is_cancelled() => return Err(Error::Cancelled),
            Err(e) => return Err(Error::scan(format!("{e:#}"))),
        };

        let mut summary = ScanSummary {
            total_files: scans.len(),
            ..Default::default()
        };

        let results = self.matcher.match_files(scans).await;

        for result in results {
            let item = result.scan_result.path.display().to_string();

            if let Some(err) = &result.error {
                summary.errors.push(ItemFailure::new(item, err));
                summary.unmatched_files += 1;
                continue;
            }

            let Some(movie) = &result.movie else {
                summary.unmatched_files += 1;
                continue;
            };

            summary.matched_files += 1;
            if result.created_new_movie {
                summary.new_movies += 1;
                if let Err(failure) = self.record_file(&result.scan_result, movie).await {
                    summary.errors.push(failure);
                }
            } else {
                summary.existing_movies += 1;
            }
        }

        info!(
            total = summary.total_files,
            matched = summary.matched_files,
            unmatched = summary.unmatched_files,
            new_movies = summary.new_movies,
            existing_movies = summary.existing_movies,
            errors = summary.errors.len(),
            "Library scan completed"
        );

        Ok(summary)
    }

    /// Match a single file on demand.
    ///
    /// Unless `force_rematch` is set, a file already recorded in the catalog
    /// resolves to its movie as an exact match without any lookup. A forced
    /// rematch that resolves a different movie moves the record to it.
    pub async fn match_file(
        &self,
        cancel: &CancellationToken,
        path: &Path,
        force_rematch: bool,
    ) -> Result<MatchResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !self.scanner.is_media_file(path) {
            return Err(Error::NotMediaFile(path.to_path_buf()));
        }

        let path_str = path.to_string_lossy();
        let scan = self
            .scanner
            .scan_file(path)
            .map_err(|e| Error::scan(format!("{e:#}")))?;

        if !force_rematch {
            if let Some(file) = self.repo.get_movie_file_by_path(&path_str).await? {
                if let Some(movie) = self.repo.get_movie(file.movie_id).await? {
                    debug!(path = %path_str, movie_id = %movie.id, "File already in catalog");
                    return Ok(MatchResult::matched(scan, movie, MatchType::Exact, 1.0));
                }
            }
        }

        if scan.parsed_title.is_empty() {
            return Err(Error::invalid_input(format!(
                "could not parse a title from {}",
                path.display()
            )));
        }

        let result = self.matcher.match_file(scan).await;

        if let Some(movie) = &result.movie {
            match self.repo.get_movie_file_by_path(&path_str).await {
                Ok(Some(existing)) if existing.movie_id != movie.id => {
                    let relinked =
                        NewMovieFile::new(movie.id, existing.file_path.clone(), existing.file_size);
                    match self.repo.update_movie_file(existing.id, &relinked).await {
                        Ok(_) => info!(
                            path = %path_str,
                            from = %existing.movie_id,
                            to = %movie.id,
                            "Relinked file record after rematch"
                        ),
                        Err(e) => warn!(path = %path_str, "Failed to relink file record: {}", e),
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    if let Err(failure) = self.record_file(&result.scan_result, movie).await {
                        warn!("{}", failure);
                    }
                }
                Err(e) => warn!(path = %path_str, "Failed to check for file record: {}", e),
            }
        }

        Ok(result)
    }

    /// Probe a file and persist its record under `movie`.
    async fn record_file(
        &self,
        scan: &ScanResult,
        movie: &Movie,
    ) -> std::result::Result<(), ItemFailure> {
        let item = scan.path.display().to_string();

        let probe = self
            .prober
            .probe(&scan.path)
            .map_err(|e| ItemFailure::from_anyhow(item.clone(), &e.context("probe failed")))?;

        let mut file = NewMovieFile::new(movie.id, scan.path_str(), probe.file_size);
        file.container = probe.container;
        file.resolution = probe.resolution;
        file.video_codec = probe.video_codec;
        file.audio_codec = probe.audio_codec;
        file.bitrate_kbps = probe.bitrate_kbps;

        self.repo
            .create_movie_file(&file)
            .await
            .map(|_| ())
            .map_err(|e| ItemFailure::new(item, format!("failed to record file: {e}")))
    }
}

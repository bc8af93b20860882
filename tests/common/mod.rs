//! Shared test harness for integration tests.
//!
//! Provides an in-memory catalog and hand-written stand-ins for the
//! reconcilers' collaborators (scanner, metadata provider, prober, Radarr).

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use cinesync::arr::types::{RadarrMovie, RadarrMovieFile};
use cinesync::arr::RadarrApi;
use cinesync::catalog::{
    CatalogRepository, Collection, Credit, Genre, Movie, MovieFile, NewCollection, NewCredit,
    NewMovie, NewMovieFile, SqliteCatalog,
};
use cinesync::metadata::{MetadataProvider, MovieCandidate};
use cinesync::scanner::{FileProber, FilenameParser, ProbeInfo, ScanResult, Scanner};
use cinesync_common::{CollectionId, MovieFileId, MovieId};
use cinesync_db::pool::init_memory_pool;

/// A fresh in-memory catalog.
pub fn catalog() -> Arc<SqliteCatalog> {
    let pool = init_memory_pool().expect("failed to create in-memory pool");
    Arc::new(SqliteCatalog::new(pool))
}

/// The same catalog behind the trait object the reconcilers take.
pub fn as_repo(catalog: &Arc<SqliteCatalog>) -> Arc<dyn CatalogRepository> {
    catalog.clone()
}

/// Catalog that refuses to create movies with one title and otherwise
/// delegates to a real [`SqliteCatalog`].
pub struct RejectingCatalog {
    inner: Arc<SqliteCatalog>,
    rejected_title: String,
}

impl RejectingCatalog {
    pub fn new(inner: Arc<SqliteCatalog>, rejected_title: &str) -> Self {
        Self {
            inner,
            rejected_title: rejected_title.to_string(),
        }
    }
}

#[async_trait]
impl CatalogRepository for RejectingCatalog {
    async fn get_movie(&self, id: MovieId) -> cinesync_common::Result<Option<Movie>> {
        self.inner.get_movie(id).await
    }

    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> cinesync_common::Result<Option<Movie>> {
        self.inner.get_movie_by_tmdb_id(tmdb_id).await
    }

    async fn get_movie_by_radarr_id(
        &self,
        radarr_id: i64,
    ) -> cinesync_common::Result<Option<Movie>> {
        self.inner.get_movie_by_radarr_id(radarr_id).await
    }

    async fn search_movies_by_title(
        &self,
        title: &str,
        limit: u32,
    ) -> cinesync_common::Result<Vec<Movie>> {
        self.inner.search_movies_by_title(title, limit).await
    }

    async fn list_movies(&self, limit: u32, offset: u32) -> cinesync_common::Result<Vec<Movie>> {
        self.inner.list_movies(limit, offset).await
    }

    async fn count_movies(&self) -> cinesync_common::Result<u64> {
        self.inner.count_movies().await
    }

    async fn create_movie(&self, movie: &NewMovie) -> cinesync_common::Result<Movie> {
        if movie.title == self.rejected_title {
            return Err(cinesync_common::Error::database("disk I/O error"));
        }
        self.inner.create_movie(movie).await
    }

    async fn update_movie(&self, id: MovieId, movie: &NewMovie) -> cinesync_common::Result<Movie> {
        self.inner.update_movie(id, movie).await
    }

    async fn create_movie_file(&self, file: &NewMovieFile) -> cinesync_common::Result<MovieFile> {
        self.inner.create_movie_file(file).await
    }

    async fn update_movie_file(
        &self,
        id: MovieFileId,
        file: &NewMovieFile,
    ) -> cinesync_common::Result<MovieFile> {
        self.inner.update_movie_file(id, file).await
    }

    async fn get_movie_file_by_path(
        &self,
        path: &str,
    ) -> cinesync_common::Result<Option<MovieFile>> {
        self.inner.get_movie_file_by_path(path).await
    }

    async fn get_movie_file_by_radarr_id(
        &self,
        radarr_file_id: i64,
    ) -> cinesync_common::Result<Option<MovieFile>> {
        self.inner.get_movie_file_by_radarr_id(radarr_file_id).await
    }

    async fn movie_file_exists(&self, path: &str) -> cinesync_common::Result<bool> {
        self.inner.movie_file_exists(path).await
    }

    async fn list_movie_files(&self, movie_id: MovieId) -> cinesync_common::Result<Vec<MovieFile>> {
        self.inner.list_movie_files(movie_id).await
    }

    async fn get_collection_by_tmdb_id(
        &self,
        tmdb_id: i64,
    ) -> cinesync_common::Result<Option<Collection>> {
        self.inner.get_collection_by_tmdb_id(tmdb_id).await
    }

    async fn create_collection(
        &self,
        collection: &NewCollection,
    ) -> cinesync_common::Result<Collection> {
        self.inner.create_collection(collection).await
    }

    async fn update_collection(
        &self,
        id: CollectionId,
        collection: &NewCollection,
    ) -> cinesync_common::Result<Collection> {
        self.inner.update_collection(id, collection).await
    }

    async fn add_movie_to_collection(
        &self,
        collection_id: CollectionId,
        movie_id: MovieId,
    ) -> cinesync_common::Result<()> {
        self.inner.add_movie_to_collection(collection_id, movie_id).await
    }

    async fn list_collections_for_movie(
        &self,
        movie_id: MovieId,
    ) -> cinesync_common::Result<Vec<Collection>> {
        self.inner.list_collections_for_movie(movie_id).await
    }

    async fn create_credit(&self, credit: &NewCredit) -> cinesync_common::Result<Credit> {
        self.inner.create_credit(credit).await
    }

    async fn list_credits(&self, movie_id: MovieId) -> cinesync_common::Result<Vec<Credit>> {
        self.inner.list_credits(movie_id).await
    }

    async fn add_movie_genre(
        &self,
        movie_id: MovieId,
        tmdb_genre_id: Option<i64>,
        name: &str,
    ) -> cinesync_common::Result<()> {
        self.inner.add_movie_genre(movie_id, tmdb_genre_id, name).await
    }

    async fn list_movie_genres(&self, movie_id: MovieId) -> cinesync_common::Result<Vec<Genre>> {
        self.inner.list_movie_genres(movie_id).await
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Scanner that returns a fixed list of results.
#[derive(Default)]
pub struct StubScanner {
    pub results: Vec<ScanResult>,
    pub fail: bool,
    /// Fire the caller's token partway through the walk.
    pub cancel_midway: bool,
}

impl StubScanner {
    pub fn with_files(names: &[&str]) -> Self {
        Self {
            results: names.iter().map(|n| scan_result(n)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn cancelling(names: &[&str]) -> Self {
        Self {
            cancel_midway: true,
            ..Self::with_files(names)
        }
    }
}

impl Scanner for StubScanner {
    fn scan(&self, cancel: &CancellationToken) -> Result<Vec<ScanResult>> {
        if self.fail {
            anyhow::bail!("library root unreadable");
        }
        if self.cancel_midway {
            cancel.cancel();
        }
        if cancel.is_cancelled() {
            anyhow::bail!("scan cancelled");
        }
        Ok(self.results.clone())
    }

    fn scan_file(&self, path: &Path) -> Result<ScanResult> {
        Ok(scan_result(&path.to_string_lossy()))
    }

    fn is_media_file(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("mkv") | Some("mp4")
        )
    }
}

/// Scan result for a file under `/library`, parsed like the real scanner.
pub fn scan_result(name: &str) -> ScanResult {
    let parser = FilenameParser::new().expect("filename patterns compile");
    let path = PathBuf::from("/library").join(name);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parsed = parser.parse(&file_name);

    ScanResult {
        parse_error: parsed
            .title
            .is_empty()
            .then(|| "no title in file name".to_string()),
        path,
        file_name,
        parsed_title: parsed.title,
        parsed_year: parsed.year,
        file_size: 1_000_000,
        is_media_file: true,
    }
}

// ---------------------------------------------------------------------------
// Prober
// ---------------------------------------------------------------------------

/// Prober that reports a fixed size without touching the filesystem.
pub struct StubProber;

impl FileProber for StubProber {
    fn probe(&self, path: &Path) -> Result<ProbeInfo> {
        Ok(ProbeInfo {
            file_size: 1_000_000,
            container: path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
            ..Default::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Metadata provider
// ---------------------------------------------------------------------------

/// Provider answering searches from a title-keyed table.
#[derive(Default)]
pub struct StubProvider {
    results: HashMap<String, Vec<MovieCandidate>>,
    failing: HashSet<String>,
    pub searches: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches for `title` (case-insensitive) return `candidate`.
    pub fn with_movie(mut self, title: &str, candidate: MovieCandidate) -> Self {
        self.results
            .entry(title.to_lowercase())
            .or_default()
            .push(candidate);
        self
    }

    /// Searches for `title` fail.
    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_lowercase());
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().len()
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search_movies(&self, title: &str, _year: Option<i32>) -> Result<Vec<MovieCandidate>> {
        let key = title.to_lowercase();
        self.searches.lock().push(key.clone());
        if self.failing.contains(&key) {
            anyhow::bail!("metadata service returned 503");
        }
        Ok(self.results.get(&key).cloned().unwrap_or_default())
    }

    async fn enrich_movie(&self, _candidate: &mut MovieCandidate) -> Result<()> {
        Ok(())
    }

    async fn get_credits(&self, _movie_id: MovieId, _tmdb_id: i64) -> Result<Vec<NewCredit>> {
        Ok(Vec::new())
    }

    async fn get_genres(&self, _movie_id: MovieId, _tmdb_id: i64) -> Result<Vec<Genre>> {
        Ok(Vec::new())
    }
}

pub fn candidate(tmdb_id: i64, title: &str, year: i32, popularity: f64) -> MovieCandidate {
    MovieCandidate {
        tmdb_id,
        title: title.to_string(),
        release_date: NaiveDate::from_ymd_opt(year, 6, 1),
        popularity: Some(popularity),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Radarr
// ---------------------------------------------------------------------------

/// Pauses `get_all_movies` until released, to hold a sync in flight.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-memory Radarr.
#[derive(Default)]
pub struct StubRadarr {
    pub movies: Mutex<Vec<RadarrMovie>>,
    pub files: Mutex<HashMap<i64, Vec<RadarrMovieFile>>>,
    pub fail: Mutex<bool>,
    pub gate: Option<Arc<Gate>>,
}

impl StubRadarr {
    pub fn new(movies: Vec<RadarrMovie>) -> Self {
        Self {
            movies: Mutex::new(movies),
            ..Default::default()
        }
    }

    pub fn gated(movies: Vec<RadarrMovie>, gate: Arc<Gate>) -> Self {
        Self {
            movies: Mutex::new(movies),
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn add_file(&self, file: RadarrMovieFile) {
        self.files.lock().entry(file.movie_id).or_default().push(file);
    }

    pub fn remove_movie(&self, id: i64) {
        self.movies.lock().retain(|m| m.id != id);
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

#[async_trait]
impl RadarrApi for StubRadarr {
    async fn get_all_movies(&self) -> Result<Vec<RadarrMovie>> {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if *self.fail.lock() {
            anyhow::bail!("connection refused");
        }
        Ok(self.movies.lock().clone())
    }

    async fn get_movie(&self, id: i64) -> Result<RadarrMovie> {
        self.movies
            .lock()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GET /movie/{} returned 404 Not Found", id))
    }

    async fn get_movie_files(&self, movie_id: i64) -> Result<Vec<RadarrMovieFile>> {
        Ok(self.files.lock().get(&movie_id).cloned().unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(!*self.fail.lock())
    }
}

pub fn radarr_movie(id: i64, title: &str, year: i32, tmdb_id: i64, has_file: bool) -> RadarrMovie {
    RadarrMovie {
        id,
        title: title.to_string(),
        year,
        tmdb_id,
        has_file,
        ..Default::default()
    }
}

pub fn radarr_file(id: i64, movie_id: i64, path: &str) -> RadarrMovieFile {
    RadarrMovieFile {
        id,
        movie_id,
        path: Some(path.to_string()),
        size: 4_000_000_000,
        ..Default::default()
    }
}

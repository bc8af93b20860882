//! Reconciliation of the catalog against Radarr.
//!
//! Radarr is authoritative for the movies it manages. A full sync adds
//! what the catalog lacks, updates what it has and counts (but never
//! deletes) what Radarr no longer reports. Every add and update cascades to
//! the movie's genres, collection and files.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use cinesync_common::MovieId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::client::RadarrApi;
use super::mapper;
use super::status::{RunState, SyncResult, SyncStatus};
use super::types::{RadarrCollection, RadarrMovie};
use crate::catalog::CatalogRepository;
use crate::error::{Error, ItemFailure, Result};

/// Page size for building the local `radarr_id → movie` map.
pub const LOCAL_LISTING_LIMIT: u32 = 10_000;

/// What a single-movie sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Added(MovieId),
    Updated(MovieId),
    /// Radarr has no file for the movie; the catalog was left alone.
    Skipped,
}

impl SyncOutcome {
    pub fn movie_id(&self) -> Option<MovieId> {
        match self {
            SyncOutcome::Added(id) | SyncOutcome::Updated(id) => Some(*id),
            SyncOutcome::Skipped => None,
        }
    }
}

/// Diffs Radarr against the catalog.
///
/// Full syncs are single-flight per instance: a second
/// [`sync_library`](Self::sync_library) while one runs fails with
/// [`Error::AlreadyRunning`]. Single-movie syncs are not serialized.
pub struct RadarrSync {
    client: Arc<dyn RadarrApi>,
    repo: Arc<dyn CatalogRepository>,
    state: RunState,
}

impl RadarrSync {
    pub fn new(client: Arc<dyn RadarrApi>, repo: Arc<dyn CatalogRepository>) -> Self {
        Self {
            client,
            repo,
            state: RunState::new(),
        }
    }

    /// Snapshot of the last full sync.
    pub fn status(&self) -> SyncStatus {
        self.state.snapshot()
    }

    /// Reconcile every Radarr movie with the catalog.
    ///
    /// Cancellation is checked before each movie; a cancelled run returns
    /// [`Error::Cancelled`] and its partial counts are discarded.
    pub async fn sync_library(&self, cancel: &CancellationToken) -> Result<SyncResult> {
        let guard = self.state.try_begin().ok_or(Error::AlreadyRunning)?;
        let start = Instant::now();
        info!("Starting library sync from Radarr");

        let radarr_movies = match self.client.get_all_movies().await {
            Ok(movies) => movies,
            Err(e) => {
                let msg = format!("{e:#}");
                guard.record_error(msg.clone());
                return Err(Error::Fetch(msg));
            }
        };
        info!(count = radarr_movies.len(), "Fetched movies from Radarr");

        let known = match self.known_movies().await {
            Ok(known) => known,
            Err(e) => {
                guard.record_error(format!("failed to list local movies: {e}"));
                return Err(e.into());
            }
        };

        let mut result = SyncResult::default();
        let mut seen = HashSet::with_capacity(radarr_movies.len());

        for movie in &radarr_movies {
            if cancel.is_cancelled() {
                guard.record_error("sync cancelled");
                return Err(Error::Cancelled);
            }

            seen.insert(movie.id);

            if !movie.has_file {
                result.skipped += 1;
                continue;
            }

            match known.get(&movie.id) {
                Some(&movie_id) => match self.update_movie(movie, movie_id).await {
                    Ok(()) => result.updated += 1,
                    Err(e) => {
                        error!(radarr_id = movie.id, "Failed to update movie: {}", e);
                        result
                            .errors
                            .push(ItemFailure::new(format!("update radarr movie {}", movie.id), e));
                    }
                },
                None => match self.add_movie(movie).await {
                    Ok(SyncOutcome::Added(_)) => result.added += 1,
                    Ok(SyncOutcome::Updated(_)) => result.updated += 1,
                    Ok(SyncOutcome::Skipped) => result.skipped += 1,
                    Err(e) => {
                        error!(radarr_id = movie.id, "Failed to add movie: {}", e);
                        result
                            .errors
                            .push(ItemFailure::new(format!("add radarr movie {}", movie.id), e));
                    }
                },
            }
        }

        for (radarr_id, movie_id) in &known {
            if !seen.contains(radarr_id) {
                info!(
                    radarr_id = *radarr_id,
                    movie_id = %movie_id,
                    "Movie no longer in Radarr, keeping local entry"
                );
                result.removed += 1;
            }
        }

        result.duration = start.elapsed();
        guard.complete(&result, radarr_movies.len());

        info!(
            added = result.added,
            updated = result.updated,
            removed = result.removed,
            skipped = result.skipped,
            errors = result.errors.len(),
            duration_ms = result.duration.as_millis() as u64,
            "Library sync completed"
        );

        Ok(result)
    }

    /// Reconcile one Radarr movie, exactly as a full sync would.
    ///
    /// A movie without a file is [`SyncOutcome::Skipped`] whether or not
    /// the catalog knows it; an existing entry and its file records stay.
    pub async fn sync_movie(
        &self,
        cancel: &CancellationToken,
        radarr_id: i64,
    ) -> Result<SyncOutcome> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let movie = self
            .client
            .get_movie(radarr_id)
            .await
            .map_err(|e| Error::fetch(format!("{e:#}")))?;

        if !movie.has_file {
            debug!(radarr_id, title = %movie.title, "Radarr movie has no file, skipping");
            return Ok(SyncOutcome::Skipped);
        }

        match self.repo.get_movie_by_radarr_id(radarr_id).await? {
            Some(existing) => {
                self.update_movie(&movie, existing.id).await?;
                Ok(SyncOutcome::Updated(existing.id))
            }
            None => self.add_movie(&movie).await,
        }
    }

    /// `radarr_id → movie id` for every catalog movie Radarr has touched.
    async fn known_movies(&self) -> cinesync_common::Result<HashMap<i64, MovieId>> {
        let movies = self.repo.list_movies(LOCAL_LISTING_LIMIT, 0).await?;
        Ok(movies
            .into_iter()
            .filter_map(|m| m.radarr_id.map(|rid| (rid, m.id)))
            .collect())
    }

    /// Create a catalog entry for a Radarr movie the catalog has no Radarr
    /// ID for. A movie already present under the same TMDB id (e.g. matched
    /// from a scan) is adopted and updated instead.
    async fn add_movie(&self, movie: &RadarrMovie) -> Result<SyncOutcome> {
        if movie.tmdb_id > 0 {
            if let Some(existing) = self.repo.get_movie_by_tmdb_id(movie.tmdb_id).await? {
                debug!(
                    movie_id = %existing.id,
                    tmdb_id = movie.tmdb_id,
                    "Adopting existing movie for Radarr"
                );
                self.update_movie(movie, existing.id).await?;
                return Ok(SyncOutcome::Updated(existing.id));
            }
        }

        let created = self.repo.create_movie(&mapper::to_new_movie(movie)).await?;
        self.cascade(movie, created.id).await;
        debug!(movie_id = %created.id, title = %movie.title, "Added movie from Radarr");
        Ok(SyncOutcome::Added(created.id))
    }

    async fn update_movie(&self, movie: &RadarrMovie, movie_id: MovieId) -> Result<()> {
        self.repo
            .update_movie(movie_id, &mapper::to_new_movie(movie))
            .await?;
        self.cascade(movie, movie_id).await;
        debug!(movie_id = %movie_id, title = %movie.title, "Updated movie from Radarr");
        Ok(())
    }

    /// Sync genres, collection and files. Failures are logged only.
    async fn cascade(&self, movie: &RadarrMovie, movie_id: MovieId) {
        for genre in &movie.genres {
            if let Err(e) = self.repo.add_movie_genre(movie_id, None, genre).await {
                warn!(movie_id = %movie_id, genre = %genre, "Failed to add genre: {}", e);
            }
        }

        if let Some(collection) = &movie.collection {
            if let Err(e) = self.sync_collection(collection, movie_id).await {
                warn!(movie_id = %movie_id, "Failed to sync collection: {}", e);
            }
        }

        if movie.has_file {
            if let Err(e) = self.sync_files(movie, movie_id).await {
                warn!(movie_id = %movie_id, "Failed to sync movie files: {:#}", e);
            }
        }
    }

    async fn sync_collection(
        &self,
        collection: &RadarrCollection,
        movie_id: MovieId,
    ) -> cinesync_common::Result<()> {
        let new = mapper::to_new_collection(collection);

        let existing = match new.tmdb_collection_id {
            Some(tmdb_id) => self.repo.get_collection_by_tmdb_id(tmdb_id).await?,
            None => None,
        };

        let collection_id = match existing {
            Some(existing) => {
                if let Err(e) = self.repo.update_collection(existing.id, &new).await {
                    warn!(collection_id = %existing.id, "Failed to update collection: {}", e);
                }
                existing.id
            }
            None => self.repo.create_collection(&new).await?.id,
        };

        if let Err(e) = self.repo.add_movie_to_collection(collection_id, movie_id).await {
            warn!(
                movie_id = %movie_id,
                collection_id = %collection_id,
                "Failed to link movie to collection: {}",
                e
            );
        }
        Ok(())
    }

    async fn sync_files(&self, movie: &RadarrMovie, movie_id: MovieId) -> anyhow::Result<()> {
        let files = self.client.get_movie_files(movie.id).await?;

        for file in &files {
            let Some(new) = mapper::to_new_movie_file(file, movie.path.as_deref(), movie_id) else {
                warn!(radarr_file_id = file.id, "Radarr file has no usable path, skipping");
                continue;
            };

            // A scan may already have recorded the same path without a Radarr id.
            let existing = match self.repo.get_movie_file_by_radarr_id(file.id).await? {
                Some(existing) => Some(existing),
                None => self.repo.get_movie_file_by_path(&new.file_path).await?,
            };

            match existing {
                Some(existing) => {
                    if let Err(e) = self.repo.update_movie_file(existing.id, &new).await {
                        warn!(file_id = %existing.id, "Failed to update movie file: {}", e);
                    }
                }
                None => {
                    if let Err(e) = self.repo.create_movie_file(&new).await {
                        warn!(
                            movie_id = %movie_id,
                            path = %new.file_path,
                            "Failed to create movie file: {}",
                            e
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

//! Run state of the Radarr reconciler.
//!
//! [`RunState`] is a two-state machine (`idle`, `running`). The only way
//! into `running` is [`RunState::try_begin`], and the returned
//! [`RunGuard`] puts it back to `idle` when dropped, on every exit path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::ItemFailure;

/// Snapshot of the reconciler's most recent full sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_error: Option<String>,
    pub movies_added: usize,
    pub movies_updated: usize,
    pub movies_removed: usize,
    pub total_movies: usize,
}

/// Outcome of one full sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    pub added: usize,
    pub updated: usize,
    /// Known locally but gone from Radarr. Never deleted.
    pub removed: usize,
    /// Radarr movies without a file.
    pub skipped: usize,
    pub errors: Vec<ItemFailure>,
    pub duration: Duration,
}

/// Guarded [`SyncStatus`].
#[derive(Debug, Default)]
pub struct RunState {
    status: Mutex<SyncStatus>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current status.
    pub fn snapshot(&self) -> SyncStatus {
        self.status.lock().clone()
    }

    /// Move to `running`, or `None` if a run is already in progress.
    pub fn try_begin(&self) -> Option<RunGuard<'_>> {
        let mut status = self.status.lock();
        if status.running {
            return None;
        }
        status.running = true;
        Some(RunGuard { state: self })
    }
}

/// Proof of an in-progress run. Dropping it ends the run.
#[derive(Debug)]
pub struct RunGuard<'a> {
    state: &'a RunState,
}

impl RunGuard<'_> {
    pub fn record_error(&self, error: impl Into<String>) {
        self.state.status.lock().last_sync_error = Some(error.into());
    }

    /// Publish a completed run's counts and clear the last error.
    pub fn complete(&self, result: &SyncResult, total_movies: usize) {
        let mut status = self.state.status.lock();
        status.movies_added = result.added;
        status.movies_updated = result.updated;
        status.movies_removed = result.removed;
        status.total_movies = total_movies;
        status.last_sync_error = None;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut status = self.state.status.lock();
        status.running = false;
        status.last_sync = Some(Utc::now());
    }
}

//! Radarr reconciliation integration tests.
//!
//! Drives [`RadarrSync`] and [`WebhookDispatcher`] against a stub Radarr and
//! the in-memory catalog.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use tokio_util::sync::CancellationToken;

use cinesync::arr::types::{RadarrCollection, RadarrWebhook, WebhookMovie};
use cinesync::arr::{RadarrSync, SyncOutcome, WebhookDispatcher, WebhookOutcome};
use cinesync::catalog::{CatalogRepository, NewMovie, NewMovieFile};
use cinesync::Error;
use common::{as_repo, catalog, radarr_file, radarr_movie, Gate, RejectingCatalog, StubRadarr};

fn library() -> StubRadarr {
    let mut matrix = radarr_movie(1, "The Matrix", 1999, 603, true);
    matrix.genres = vec!["Action".into(), "Science Fiction".into()];
    matrix.collection = Some(RadarrCollection {
        name: "The Matrix Collection".into(),
        tmdb_id: 2344,
        ..Default::default()
    });

    let radarr = StubRadarr::new(vec![
        matrix,
        radarr_movie(2, "Heat", 1995, 949, true),
        radarr_movie(3, "Dune: Part Three", 2026, 0, false),
    ]);
    radarr.add_file(radarr_file(10, 1, "/movies/The Matrix (1999)/The.Matrix.1999.mkv"));
    radarr.add_file(radarr_file(20, 2, "/movies/Heat (1995)/Heat.1995.mkv"));
    radarr
}

// ---------------------------------------------------------------------------
// sync_library
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_sync_adds_movies_with_files() {
    let db = catalog();
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&db));

    let result = sync.sync_library(&CancellationToken::new()).await.unwrap();

    assert_eq!(result.added, 2);
    assert_eq!(result.updated, 0);
    assert_eq!(result.removed, 0);
    assert_eq!(result.skipped, 1);
    assert!(result.errors.is_empty());

    let matrix = db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    assert_eq!(matrix.tmdb_id, Some(603));
    assert_eq!(db.list_movie_genres(matrix.id).await.unwrap().len(), 2);
    let collections = db.list_collections_for_movie(matrix.id).await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "The Matrix Collection");

    let files = db.list_movie_files(matrix.id).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].radarr_file_id, Some(10));

    assert!(db.get_movie_by_radarr_id(3).await.unwrap().is_none());

    let status = sync.status();
    assert!(!status.running);
    assert!(status.last_sync.is_some());
    assert_eq!(status.last_sync_error, None);
    assert_eq!(status.movies_added, 2);
    assert_eq!(status.total_movies, 3);
}

#[tokio::test]
async fn repeated_sync_is_idempotent() {
    let db = catalog();
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&db));
    let cancel = CancellationToken::new();

    sync.sync_library(&cancel).await.unwrap();
    let count = db.count_movies().await.unwrap();

    let second = sync.sync_library(&cancel).await.unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.updated, 2);
    assert_eq!(second.skipped, 1);
    assert_eq!(db.count_movies().await.unwrap(), count);

    let matrix = db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    assert_eq!(db.list_movie_files(matrix.id).await.unwrap().len(), 1);
    assert_eq!(db.list_movie_genres(matrix.id).await.unwrap().len(), 2);
    assert_eq!(db.list_collections_for_movie(matrix.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn movies_gone_from_radarr_are_kept() {
    let db = catalog();
    let radarr = Arc::new(library());
    let sync = RadarrSync::new(radarr.clone(), as_repo(&db));
    let cancel = CancellationToken::new();

    sync.sync_library(&cancel).await.unwrap();
    radarr.remove_movie(2);

    let result = sync.sync_library(&cancel).await.unwrap();
    assert_eq!(result.removed, 1);
    assert_eq!(result.updated, 1);
    assert!(db.get_movie_by_radarr_id(2).await.unwrap().is_some());
    assert_eq!(sync.status().movies_removed, 1);
}

#[tokio::test]
async fn scanned_movie_is_adopted_by_tmdb_id() {
    let db = catalog();
    let scanned = db
        .create_movie(&NewMovie {
            title: "The Matrix".into(),
            year: Some(1999),
            tmdb_id: Some(603),
            ..Default::default()
        })
        .await
        .unwrap();
    db.create_movie_file(&NewMovieFile::new(
        scanned.id,
        "/movies/The Matrix (1999)/The.Matrix.1999.mkv",
        4_000_000_000,
    ))
    .await
    .unwrap();

    let sync = RadarrSync::new(Arc::new(library()), as_repo(&db));
    let result = sync.sync_library(&CancellationToken::new()).await.unwrap();

    assert_eq!(result.added, 1);
    assert_eq!(result.updated, 1);
    assert_eq!(db.count_movies().await.unwrap(), 2);

    let adopted = db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    assert_eq!(adopted.id, scanned.id);
    let files = db.list_movie_files(scanned.id).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].radarr_file_id, Some(10));
}

#[tokio::test]
async fn fetch_failure_is_recorded() {
    let db = catalog();
    let radarr = library();
    radarr.set_failing(true);
    let sync = RadarrSync::new(Arc::new(radarr), as_repo(&db));

    let err = sync
        .sync_library(&CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, Error::Fetch(msg) if msg.contains("connection refused"));

    let status = sync.status();
    assert!(!status.running);
    assert!(status
        .last_sync_error
        .as_deref()
        .is_some_and(|e| e.contains("connection refused")));
    assert_eq!(db.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn cancelled_sync_keeps_previous_counts() {
    let db = catalog();
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&db));

    sync.sync_library(&CancellationToken::new()).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    assert_matches!(sync.sync_library(&cancel).await, Err(Error::Cancelled));

    let status = sync.status();
    assert!(!status.running);
    assert_eq!(status.movies_added, 2);
    assert_eq!(status.last_sync_error.as_deref(), Some("sync cancelled"));
}

#[tokio::test]
async fn concurrent_sync_is_rejected() {
    let db = catalog();
    let gate = Arc::new(Gate::default());
    let radarr = StubRadarr::gated(
        vec![radarr_movie(1, "The Matrix", 1999, 603, false)],
        gate.clone(),
    );
    let sync = Arc::new(RadarrSync::new(Arc::new(radarr), as_repo(&db)));
    let cancel = CancellationToken::new();

    let first = {
        let sync = sync.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { sync.sync_library(&cancel).await })
    };

    gate.entered.notified().await;
    let before = sync.status();
    assert!(before.running);

    assert_matches!(sync.sync_library(&cancel).await, Err(Error::AlreadyRunning));
    assert_eq!(sync.status(), before);

    gate.release.notify_one();
    let result = first.await.unwrap().unwrap();
    assert_eq!(result.skipped, 1);

    let after = sync.status();
    assert!(!after.running);
    assert_eq!(after.total_movies, 1);
}

#[tokio::test]
async fn failed_record_does_not_stop_the_run() {
    let db = catalog();
    let repo = Arc::new(RejectingCatalog::new(db.clone(), "The Matrix"));
    let sync = RadarrSync::new(Arc::new(library()), repo);

    let result = sync.sync_library(&CancellationToken::new()).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].item, "add radarr movie 1");
    assert!(result.errors[0].cause.contains("disk I/O error"));
    assert_eq!(result.added, 1);
    assert_eq!(result.skipped, 1);

    assert!(db.get_movie_by_radarr_id(1).await.unwrap().is_none());
    let heat = db.get_movie_by_radarr_id(2).await.unwrap().unwrap();
    assert_eq!(db.list_movie_files(heat.id).await.unwrap().len(), 1);
    assert_eq!(sync.status().last_sync_error, None);
}

// ---------------------------------------------------------------------------
// sync_movie
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_movie_matches_full_sync() {
    let full_db = catalog();
    RadarrSync::new(Arc::new(library()), as_repo(&full_db))
        .sync_library(&CancellationToken::new())
        .await
        .unwrap();

    let single_db = catalog();
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&single_db));
    let outcome = sync
        .sync_movie(&CancellationToken::new(), 1)
        .await
        .unwrap();
    assert_matches!(outcome, SyncOutcome::Added(_));

    let via_full = full_db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    let via_single = single_db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    assert_eq!(via_full.title, via_single.title);
    assert_eq!(via_full.year, via_single.year);
    assert_eq!(via_full.tmdb_id, via_single.tmdb_id);

    let full_files = full_db.list_movie_files(via_full.id).await.unwrap();
    let single_files = single_db.list_movie_files(via_single.id).await.unwrap();
    assert_eq!(full_files.len(), single_files.len());
    assert_eq!(full_files[0].file_path, single_files[0].file_path);
    assert_eq!(
        full_db.list_movie_genres(via_full.id).await.unwrap().len(),
        single_db.list_movie_genres(via_single.id).await.unwrap().len()
    );

    let again = sync
        .sync_movie(&CancellationToken::new(), 1)
        .await
        .unwrap();
    assert_eq!(again, SyncOutcome::Updated(outcome.movie_id().unwrap()));
}

#[tokio::test]
async fn fileless_movie_is_skipped_by_both_paths() {
    let full_db = catalog();
    let full = RadarrSync::new(Arc::new(library()), as_repo(&full_db))
        .sync_library(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(full.skipped, 1);
    assert!(full_db.get_movie_by_radarr_id(3).await.unwrap().is_none());

    let single_db = catalog();
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&single_db));
    let outcome = sync
        .sync_movie(&CancellationToken::new(), 3)
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Skipped);
    assert_eq!(outcome.movie_id(), None);
    assert_eq!(single_db.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn known_movie_losing_its_file_is_kept() {
    let db = catalog();
    let radarr = Arc::new(library());
    let sync = Arc::new(RadarrSync::new(radarr.clone(), as_repo(&db)));
    let cancel = CancellationToken::new();

    sync.sync_library(&cancel).await.unwrap();
    let matrix = db.get_movie_by_radarr_id(1).await.unwrap().unwrap();

    for movie in radarr.movies.lock().iter_mut().filter(|m| m.id == 1) {
        movie.has_file = false;
    }

    let dispatcher = WebhookDispatcher::new(sync.clone());
    let outcome = dispatcher
        .dispatch(&cancel, &event("MovieFileDelete", Some(1)))
        .await
        .unwrap();
    assert_eq!(outcome, WebhookOutcome::Synced(SyncOutcome::Skipped));

    let result = sync.sync_library(&cancel).await.unwrap();
    assert_eq!(result.skipped, 2);
    assert_eq!(result.updated, 1);
    assert_eq!(result.removed, 0);

    let kept = db.get_movie_by_radarr_id(1).await.unwrap().unwrap();
    assert_eq!(kept.id, matrix.id);
    assert_eq!(db.list_movie_files(matrix.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sync_movie_unknown_id_fails() {
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&catalog()));
    let err = sync
        .sync_movie(&CancellationToken::new(), 999)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Fetch(msg) if msg.contains("404"));
}

#[tokio::test]
async fn sync_movie_does_not_touch_run_status() {
    let sync = RadarrSync::new(Arc::new(library()), as_repo(&catalog()));
    sync.sync_movie(&CancellationToken::new(), 2).await.unwrap();

    let status = sync.status();
    assert_eq!(status.last_sync, None);
    assert_eq!(status.movies_added, 0);
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

fn event(event_type: &str, radarr_id: Option<i64>) -> RadarrWebhook {
    RadarrWebhook {
        event_type: event_type.to_string(),
        movie: radarr_id.map(|id| WebhookMovie {
            id,
            title: "The Matrix".into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn download_event_syncs_the_movie() {
    let db = catalog();
    let sync = Arc::new(RadarrSync::new(Arc::new(library()), as_repo(&db)));
    let dispatcher = WebhookDispatcher::new(sync);

    let outcome = dispatcher
        .dispatch(&CancellationToken::new(), &event("Download", Some(1)))
        .await
        .unwrap();

    assert_matches!(outcome, WebhookOutcome::Synced(SyncOutcome::Added(_)));
    assert!(db.get_movie_by_radarr_id(1).await.unwrap().is_some());
}

#[tokio::test]
async fn sync_event_without_movie_is_invalid() {
    let sync = Arc::new(RadarrSync::new(Arc::new(library()), as_repo(&catalog())));
    let dispatcher = WebhookDispatcher::new(sync);

    let err = dispatcher
        .dispatch(&CancellationToken::new(), &event("Rename", None))
        .await
        .unwrap_err();
    assert_matches!(err, Error::InvalidInput(_));
}

#[tokio::test]
async fn informational_events_leave_catalog_alone() {
    let db = catalog();
    let sync = Arc::new(RadarrSync::new(Arc::new(library()), as_repo(&db)));
    let dispatcher = WebhookDispatcher::new(sync);
    let cancel = CancellationToken::new();

    assert_eq!(
        dispatcher.dispatch(&cancel, &event("Grab", Some(1))).await.unwrap(),
        WebhookOutcome::Ignored
    );
    assert_eq!(
        dispatcher.dispatch(&cancel, &event("Test", None)).await.unwrap(),
        WebhookOutcome::Ignored
    );
    assert_eq!(
        dispatcher
            .dispatch(&cancel, &event("MovieDelete", Some(1)))
            .await
            .unwrap(),
        WebhookOutcome::Logged
    );
    assert_eq!(
        dispatcher
            .dispatch(&cancel, &event("SomethingNew", Some(1)))
            .await
            .unwrap(),
        WebhookOutcome::Ignored
    );
    assert_eq!(db.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn webhook_payload_from_json() {
    let body = serde_json::json!({
        "eventType": "Download",
        "instanceName": "Radarr",
        "isUpgrade": false,
        "movie": {
            "id": 2,
            "title": "Heat",
            "year": 1995,
            "folderPath": "/movies/Heat (1995)",
            "tmdbId": 949
        },
        "movieFile": {
            "id": 20,
            "relativePath": "Heat.1995.mkv",
            "path": "/movies/Heat (1995)/Heat.1995.mkv",
            "size": 4000000000i64
        }
    });
    let payload: RadarrWebhook = serde_json::from_value(body).unwrap();

    let db = catalog();
    let dispatcher = WebhookDispatcher::new(Arc::new(RadarrSync::new(
        Arc::new(library()),
        as_repo(&db),
    )));
    dispatcher
        .dispatch(&CancellationToken::new(), &payload)
        .await
        .unwrap();

    let heat = db.get_movie_by_radarr_id(2).await.unwrap().unwrap();
    assert_eq!(heat.title, "Heat");
}

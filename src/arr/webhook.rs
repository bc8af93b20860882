//! Radarr webhook handling.
//!
//! Turns push notifications into single-movie syncs so the catalog follows
//! Radarr between full runs.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::sync::{RadarrSync, SyncOutcome};
use super::types::RadarrWebhook;
use crate::error::{Error, Result};

/// Radarr `eventType` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadarrEventKind {
    Grab,
    Download,
    Rename,
    MovieDelete,
    MovieFileDelete,
    Health,
    HealthRestored,
    ApplicationUpdate,
    ManualInteractionRequired,
    Test,
    Unknown(String),
}

impl RadarrEventKind {
    pub fn parse(event_type: &str) -> Self {
        match event_type {
            "Grab" => Self::Grab,
            "Download" => Self::Download,
            "Rename" => Self::Rename,
            "MovieDelete" => Self::MovieDelete,
            "MovieFileDelete" => Self::MovieFileDelete,
            "Health" => Self::Health,
            "HealthRestored" => Self::HealthRestored,
            "ApplicationUpdate" => Self::ApplicationUpdate,
            "ManualInteractionRequired" => Self::ManualInteractionRequired,
            "Test" => Self::Test,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether this event changes what Radarr has on disk for a movie.
    pub fn triggers_sync(&self) -> bool {
        matches!(self, Self::Download | Self::Rename | Self::MovieFileDelete)
    }
}

impl fmt::Display for RadarrEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Synced(SyncOutcome),
    /// Logged only; the catalog is left alone.
    Logged,
    Ignored,
}

/// Routes Radarr webhook events to [`RadarrSync::sync_movie`].
#[derive(Clone)]
pub struct WebhookDispatcher {
    sync: Arc<RadarrSync>,
}

impl WebhookDispatcher {
    pub fn new(sync: Arc<RadarrSync>) -> Self {
        Self { sync }
    }

    pub async fn dispatch(
        &self,
        cancel: &CancellationToken,
        payload: &RadarrWebhook,
    ) -> Result<WebhookOutcome> {
        let kind = RadarrEventKind::parse(&payload.event_type);
        let title = payload.movie.as_ref().map(|m| m.title.as_str()).unwrap_or("");

        match kind {
            ref k if k.triggers_sync() => {
                let radarr_id = payload.movie.as_ref().map(|m| m.id).ok_or_else(|| {
                    Error::invalid_input(format!("{k} event without a movie id"))
                })?;

                info!(event = %k, radarr_id, title, "Radarr webhook, syncing movie");
                let outcome = self.sync.sync_movie(cancel, radarr_id).await?;
                Ok(WebhookOutcome::Synced(outcome))
            }
            RadarrEventKind::MovieDelete => {
                info!(
                    radarr_id = ?payload.movie.as_ref().map(|m| m.id),
                    title,
                    "Movie deleted in Radarr, keeping local entry"
                );
                Ok(WebhookOutcome::Logged)
            }
            RadarrEventKind::Unknown(ref event_type) => {
                debug!(event_type = %event_type, "Ignoring unknown Radarr event");
                Ok(WebhookOutcome::Ignored)
            }
            k => {
                debug!(event = %k, title, "Ignoring informational Radarr event");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }
}

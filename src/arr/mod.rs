//! Radarr integration.
//!
//! # Module layout
//!
//! - [`client`] -- `RadarrApi` trait and the HTTP client.
//! - [`types`] -- Radarr REST and webhook payloads.
//! - [`mapper`] -- Radarr records to catalog write models.
//! - [`status`] -- Run state and per-run results.
//! - [`sync`] -- Full and single-movie reconciliation.
//! - [`webhook`] -- Event dispatch to single-movie syncs.

pub mod client;
pub mod mapper;
pub mod status;
pub mod sync;
pub mod types;
pub mod webhook;

pub use client::{RadarrApi, RadarrClient};
pub use status::{SyncResult, SyncStatus};
pub use sync::{RadarrSync, SyncOutcome};
pub use types::RadarrWebhook;
pub use webhook::{RadarrEventKind, WebhookDispatcher, WebhookOutcome};

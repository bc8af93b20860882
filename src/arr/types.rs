use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// REST API (v3)
// ---------------------------------------------------------------------------

/// A movie as returned by `GET /api/v3/movie`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub original_language: Option<RadarrLanguage>,
    pub sort_title: Option<String>,
    pub status: Option<String>,
    pub overview: Option<String>,
    pub in_cinemas: Option<DateTime<Utc>>,
    pub physical_release: Option<DateTime<Utc>>,
    pub digital_release: Option<DateTime<Utc>>,
    pub images: Vec<RadarrImage>,
    pub year: i32,
    pub has_file: bool,
    pub you_tube_trailer_id: Option<String>,
    pub studio: Option<String>,
    pub path: Option<String>,
    pub monitored: bool,
    /// Minutes; `0` when unknown.
    pub runtime: i32,
    pub imdb_id: Option<String>,
    pub tmdb_id: i64,
    pub certification: Option<String>,
    pub genres: Vec<String>,
    pub ratings: RadarrRatings,
    pub collection: Option<RadarrCollection>,
    pub popularity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrLanguage {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrImage {
    /// `poster`, `fanart`, `banner`, ...
    pub cover_type: String,
    pub url: Option<String>,
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrRatings {
    pub imdb: Option<RadarrRating>,
    pub tmdb: Option<RadarrRating>,
    pub metacritic: Option<RadarrRating>,
    pub rotten_tomatoes: Option<RadarrRating>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrRating {
    pub votes: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrCollection {
    /// Newer Radarr versions send `title`, older ones `name`.
    #[serde(alias = "title")]
    pub name: String,
    pub tmdb_id: i64,
    pub overview: Option<String>,
    pub images: Vec<RadarrImage>,
}

/// A file as returned by `GET /api/v3/moviefile?movieId=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrMovieFile {
    pub id: i64,
    pub movie_id: i64,
    pub relative_path: Option<String>,
    pub path: Option<String>,
    pub size: i64,
    pub date_added: Option<DateTime<Utc>>,
    pub scene_name: Option<String>,
    pub quality: Option<RadarrQuality>,
    pub media_info: Option<RadarrMediaInfo>,
    pub release_group: Option<String>,
    pub edition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrQuality {
    pub quality: RadarrQualityDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrQualityDetail {
    pub id: i64,
    /// e.g. `Bluray-1080p`.
    pub name: String,
    pub source: Option<String>,
    /// Vertical resolution, e.g. `1080`.
    pub resolution: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrMediaInfo {
    pub audio_bitrate: i64,
    pub audio_channels: f64,
    pub audio_codec: Option<String>,
    pub video_bit_depth: i32,
    /// Bits per second.
    pub video_bitrate: i64,
    pub video_codec: Option<String>,
    pub video_fps: f64,
    pub video_dynamic_range: Option<String>,
    /// e.g. `1920x1080`.
    pub resolution: Option<String>,
    pub run_time: Option<String>,
}

/// `GET /api/v3/system/status`, trimmed to what we log.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarrSystemStatus {
    pub app_name: Option<String>,
    pub instance_name: Option<String>,
    pub version: Option<String>,
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

/// Radarr webhook payload.
///
/// Only `event_type` and `movie.id` drive behavior; the rest is kept for logs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrWebhook {
    pub event_type: String,
    pub instance_name: Option<String>,
    pub movie: Option<WebhookMovie>,
    pub movie_file: Option<WebhookMovieFile>,
    pub remote_movie: Option<WebhookRemoteMovie>,
    pub release: Option<WebhookRelease>,
    #[serde(default)]
    pub is_upgrade: bool,
    /// Health events.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub year: Option<i32>,
    pub file_path: Option<String>,
    pub folder_path: Option<String>,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMovieFile {
    pub id: i64,
    pub relative_path: Option<String>,
    pub path: Option<String>,
    pub quality: Option<String>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRemoteMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRelease {
    pub quality: Option<String>,
    pub release_title: Option<String>,
}

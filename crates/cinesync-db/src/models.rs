//! Rust models matching the catalog schema.
//!
//! Stored rows (`Movie`, `MovieFile`, ...) carry their ID and timestamps.
//! The `New*` structs are the write side: everything the caller controls,
//! used for both inserts and updates.

use chrono::{DateTime, NaiveDate, Utc};
use cinesync_common::{CollectionId, CreditId, CreditType, MovieFileId, MovieId};
use serde::{Deserialize, Serialize};

/// A catalog movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes.
    pub runtime: Option<i32>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub trailer_url: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    pub radarr_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for creating or updating a [`Movie`].
///
/// On update, `None` fields keep the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub trailer_url: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    pub radarr_id: Option<i64>,
}

impl NewMovie {
    /// A movie with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A file on disk belonging to a movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieFile {
    pub id: MovieFileId,
    pub movie_id: MovieId,
    pub file_path: String,
    pub file_size: i64,
    pub container: Option<String>,
    pub resolution: Option<String>,
    pub quality_profile: Option<String>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub bitrate_kbps: Option<i64>,
    pub radarr_file_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for creating or updating a [`MovieFile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMovieFile {
    pub movie_id: MovieId,
    pub file_path: String,
    pub file_size: i64,
    pub container: Option<String>,
    pub resolution: Option<String>,
    pub quality_profile: Option<String>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub bitrate_kbps: Option<i64>,
    pub radarr_file_id: Option<i64>,
}

impl NewMovieFile {
    /// A file record with only the owning movie, path and size set.
    pub fn new(movie_id: MovieId, file_path: impl Into<String>, file_size: i64) -> Self {
        Self {
            movie_id,
            file_path: file_path.into(),
            file_size,
            container: None,
            resolution: None,
            quality_profile: None,
            video_codec: None,
            audio_codec: None,
            bitrate_kbps: None,
            radarr_file_id: None,
        }
    }
}

/// A named group of related movies (e.g. a trilogy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub tmdb_collection_id: Option<i64>,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for creating or updating a [`Collection`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewCollection {
    pub tmdb_collection_id: Option<i64>,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// A cast or crew credit on a movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credit {
    pub id: CreditId,
    pub movie_id: MovieId,
    pub tmdb_person_id: i64,
    pub name: String,
    pub credit_type: CreditType,
    pub character: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
    pub billing_order: Option<i32>,
    pub profile_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for creating a [`Credit`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCredit {
    pub movie_id: MovieId,
    pub tmdb_person_id: i64,
    pub name: String,
    pub credit_type: CreditType,
    pub character: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
    pub billing_order: Option<i32>,
    pub profile_path: Option<String>,
}

/// A genre tag on a movie. Unique per (movie, name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub movie_id: MovieId,
    pub tmdb_genre_id: Option<i64>,
    pub name: String,
}

//! Conversion from Radarr records to catalog write models.
//!
//! Radarr is authoritative for what it sends, so values are copied as-is.
//! Empty strings and zero placeholders become `None`.

use std::path::Path;

use chrono::NaiveDate;
use cinesync_common::MovieId;

use super::types::{RadarrCollection, RadarrImage, RadarrMovie, RadarrMovieFile};
use crate::catalog::{NewCollection, NewMovie, NewMovieFile};

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Catalog values for a Radarr movie.
pub fn to_new_movie(movie: &RadarrMovie) -> NewMovie {
    let tmdb_rating = movie.ratings.tmdb.as_ref().filter(|r| r.votes > 0 || r.value > 0.0);

    NewMovie {
        title: movie.title.clone(),
        original_title: non_empty(movie.original_title.as_deref()),
        year: (movie.year > 0).then_some(movie.year),
        release_date: release_date(movie),
        runtime: (movie.runtime > 0).then_some(movie.runtime),
        overview: non_empty(movie.overview.as_deref()),
        tagline: None,
        status: non_empty(movie.status.as_deref()),
        original_language: movie
            .original_language
            .as_ref()
            .and_then(|l| non_empty(Some(l.name.as_str()))),
        poster_path: image_url(&movie.images, "poster"),
        backdrop_path: image_url(&movie.images, "fanart"),
        trailer_url: non_empty(movie.you_tube_trailer_id.as_deref())
            .map(|id| format!("{YOUTUBE_WATCH_URL}{id}")),
        vote_average: tmdb_rating.map(|r| r.value),
        vote_count: tmdb_rating.map(|r| i32::try_from(r.votes).unwrap_or(i32::MAX)),
        popularity: movie.popularity.filter(|p| *p > 0.0),
        tmdb_id: (movie.tmdb_id > 0).then_some(movie.tmdb_id),
        imdb_id: non_empty(movie.imdb_id.as_deref()),
        radarr_id: Some(movie.id),
    }
}

/// Catalog values for a Radarr movie file belonging to `movie_id`.
///
/// A file reported only by its folder-relative path is anchored at the
/// movie's `folder`. Returns `None` when no absolute path can be built.
pub fn to_new_movie_file(
    file: &RadarrMovieFile,
    folder: Option<&str>,
    movie_id: MovieId,
) -> Option<NewMovieFile> {
    let path = match non_empty(file.path.as_deref()) {
        Some(path) => path,
        None => {
            let relative = non_empty(file.relative_path.as_deref())?;
            let folder = non_empty(folder)?;
            Path::new(&folder).join(relative).to_string_lossy().into_owned()
        }
    };

    let container = Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let media = file.media_info.as_ref();
    let quality = file.quality.as_ref().map(|q| &q.quality);

    let resolution = media
        .and_then(|m| non_empty(m.resolution.as_deref()))
        .or_else(|| {
            quality
                .filter(|q| q.resolution > 0)
                .map(|q| format!("{}p", q.resolution))
        });

    let mut new = NewMovieFile::new(movie_id, path, file.size);
    new.container = container;
    new.resolution = resolution;
    new.quality_profile = quality.and_then(|q| non_empty(Some(q.name.as_str())));
    new.video_codec = media.and_then(|m| non_empty(m.video_codec.as_deref()));
    new.audio_codec = media.and_then(|m| non_empty(m.audio_codec.as_deref()));
    new.bitrate_kbps = media
        .map(|m| m.video_bitrate / 1000)
        .filter(|kbps| *kbps > 0);
    new.radarr_file_id = Some(file.id);
    Some(new)
}

/// Catalog values for a Radarr collection.
pub fn to_new_collection(collection: &RadarrCollection) -> NewCollection {
    NewCollection {
        tmdb_collection_id: (collection.tmdb_id > 0).then_some(collection.tmdb_id),
        name: collection.name.clone(),
        overview: non_empty(collection.overview.as_deref()),
        poster_path: image_url(&collection.images, "poster"),
        backdrop_path: image_url(&collection.images, "fanart"),
    }
}

/// Theatrical release first, then digital, then physical.
fn release_date(movie: &RadarrMovie) -> Option<NaiveDate> {
    movie
        .in_cinemas
        .or(movie.digital_release)
        .or(movie.physical_release)
        .map(|d| d.date_naive())
}

fn image_url(images: &[RadarrImage], cover_type: &str) -> Option<String> {
    images
        .iter()
        .find(|i| i.cover_type.eq_ignore_ascii_case(cover_type))
        .and_then(|i| non_empty(i.remote_url.as_deref()).or_else(|| non_empty(i.url.as_deref())))
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

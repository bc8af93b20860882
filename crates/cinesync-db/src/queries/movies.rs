//! Movie query operations.
//!
//! Movies are keyed by internal ID and by two optional external keys: the
//! TMDB ID and the Radarr ID. Both external keys are unique when present.

use chrono::Utc;
use cinesync_common::{Error, MovieId, Result};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::{date_column, format_date, id_column, timestamp_column};
use crate::models::{Movie, NewMovie};

const MOVIE_COLUMNS: &str = "id, title, original_title, year, release_date, runtime, overview,
    tagline, status, original_language, poster_path, backdrop_path, trailer_url,
    vote_average, vote_count, popularity, tmdb_id, imdb_id, radarr_id, created_at, updated_at";

fn parse_movie_row(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: id_column(row, 0)?,
        title: row.get(1)?,
        original_title: row.get(2)?,
        year: row.get(3)?,
        release_date: date_column(row, 4)?,
        runtime: row.get(5)?,
        overview: row.get(6)?,
        tagline: row.get(7)?,
        status: row.get(8)?,
        original_language: row.get(9)?,
        poster_path: row.get(10)?,
        backdrop_path: row.get(11)?,
        trailer_url: row.get(12)?,
        vote_average: row.get(13)?,
        vote_count: row.get(14)?,
        popularity: row.get(15)?,
        tmdb_id: row.get(16)?,
        imdb_id: row.get(17)?,
        radarr_id: row.get(18)?,
        created_at: timestamp_column(row, 19)?,
        updated_at: timestamp_column(row, 20)?,
    })
}

/// Insert a new movie and return the stored row.
pub fn create_movie(conn: &Connection, new: &NewMovie) -> Result<Movie> {
    let id = MovieId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO movies (id, title, original_title, year, release_date, runtime, overview,
                tagline, status, original_language, poster_path, backdrop_path, trailer_url,
                vote_average, vote_count, popularity, tmdb_id, imdb_id, radarr_id,
                created_at, updated_at)
         VALUES (:id, :title, :original_title, :year, :release_date, :runtime, :overview,
                :tagline, :status, :original_language, :poster_path, :backdrop_path, :trailer_url,
                :vote_average, :vote_count, :popularity, :tmdb_id, :imdb_id, :radarr_id,
                :now, :now)",
        named_params! {
            ":id": id.to_string(),
            ":title": &new.title,
            ":original_title": &new.original_title,
            ":year": new.year,
            ":release_date": format_date(new.release_date),
            ":runtime": new.runtime,
            ":overview": &new.overview,
            ":tagline": &new.tagline,
            ":status": &new.status,
            ":original_language": &new.original_language,
            ":poster_path": &new.poster_path,
            ":backdrop_path": &new.backdrop_path,
            ":trailer_url": &new.trailer_url,
            ":vote_average": new.vote_average,
            ":vote_count": new.vote_count,
            ":popularity": new.popularity,
            ":tmdb_id": new.tmdb_id,
            ":imdb_id": &new.imdb_id,
            ":radarr_id": new.radarr_id,
            ":now": now.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Movie {
        id,
        title: new.title.clone(),
        original_title: new.original_title.clone(),
        year: new.year,
        release_date: new.release_date,
        runtime: new.runtime,
        overview: new.overview.clone(),
        tagline: new.tagline.clone(),
        status: new.status.clone(),
        original_language: new.original_language.clone(),
        poster_path: new.poster_path.clone(),
        backdrop_path: new.backdrop_path.clone(),
        trailer_url: new.trailer_url.clone(),
        vote_average: new.vote_average,
        vote_count: new.vote_count,
        popularity: new.popularity,
        tmdb_id: new.tmdb_id,
        imdb_id: new.imdb_id.clone(),
        radarr_id: new.radarr_id,
        created_at: now,
        updated_at: now,
    })
}

/// Update a movie in place.
///
/// The title is always written; every optional field only overwrites the
/// stored value when it is `Some`.
pub fn update_movie(conn: &Connection, id: MovieId, new: &NewMovie) -> Result<Movie> {
    let affected = conn
        .execute(
            "UPDATE movies SET
                title = :title,
                original_title = COALESCE(:original_title, original_title),
                year = COALESCE(:year, year),
                release_date = COALESCE(:release_date, release_date),
                runtime = COALESCE(:runtime, runtime),
                overview = COALESCE(:overview, overview),
                tagline = COALESCE(:tagline, tagline),
                status = COALESCE(:status, status),
                original_language = COALESCE(:original_language, original_language),
                poster_path = COALESCE(:poster_path, poster_path),
                backdrop_path = COALESCE(:backdrop_path, backdrop_path),
                trailer_url = COALESCE(:trailer_url, trailer_url),
                vote_average = COALESCE(:vote_average, vote_average),
                vote_count = COALESCE(:vote_count, vote_count),
                popularity = COALESCE(:popularity, popularity),
                tmdb_id = COALESCE(:tmdb_id, tmdb_id),
                imdb_id = COALESCE(:imdb_id, imdb_id),
                radarr_id = COALESCE(:radarr_id, radarr_id),
                updated_at = :now
             WHERE id = :id",
            named_params! {
                ":id": id.to_string(),
                ":title": &new.title,
                ":original_title": &new.original_title,
                ":year": new.year,
                ":release_date": format_date(new.release_date),
                ":runtime": new.runtime,
                ":overview": &new.overview,
                ":tagline": &new.tagline,
                ":status": &new.status,
                ":original_language": &new.original_language,
                ":poster_path": &new.poster_path,
                ":backdrop_path": &new.backdrop_path,
                ":trailer_url": &new.trailer_url,
                ":vote_average": new.vote_average,
                ":vote_count": new.vote_count,
                ":popularity": new.popularity,
                ":tmdb_id": new.tmdb_id,
                ":imdb_id": &new.imdb_id,
                ":radarr_id": new.radarr_id,
                ":now": Utc::now().to_rfc3339(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Err(Error::not_found(format!("movie {id}")));
    }

    get_movie(conn, id)?.ok_or_else(|| Error::not_found(format!("movie {id}")))
}

fn get_one(conn: &Connection, filter: &str, value: &dyn rusqlite::ToSql) -> Result<Option<Movie>> {
    conn.query_row(
        &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE {filter} = ?"),
        rusqlite::params![value],
        parse_movie_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a movie by ID.
pub fn get_movie(conn: &Connection, id: MovieId) -> Result<Option<Movie>> {
    get_one(conn, "id", &id.to_string())
}

/// Get a movie by its TMDB ID.
pub fn get_movie_by_tmdb_id(conn: &Connection, tmdb_id: i64) -> Result<Option<Movie>> {
    get_one(conn, "tmdb_id", &tmdb_id)
}

/// Get a movie by its Radarr ID.
pub fn get_movie_by_radarr_id(conn: &Connection, radarr_id: i64) -> Result<Option<Movie>> {
    get_one(conn, "radarr_id", &radarr_id)
}

/// Case-insensitive substring search over title and original title.
///
/// Exact (case-insensitive) title matches sort first.
pub fn search_movies_by_title(conn: &Connection, title: &str, limit: u32) -> Result<Vec<Movie>> {
    let pattern = format!("%{}%", escape_like(title));

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies
             WHERE title LIKE :pattern ESCAPE '\\' OR original_title LIKE :pattern ESCAPE '\\'
             ORDER BY (title = :title COLLATE NOCASE) DESC, title ASC
             LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let movies = stmt
        .query_map(
            named_params! {
                ":pattern": &pattern,
                ":title": title,
                ":limit": limit,
            },
            parse_movie_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(movies)
}

/// List movies ordered by creation time.
pub fn list_movies(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<Movie>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies
             ORDER BY created_at ASC, id ASC
             LIMIT :limit OFFSET :offset"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let movies = stmt
        .query_map(
            named_params! { ":limit": limit, ":offset": offset },
            parse_movie_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(movies)
}

/// Total number of movies in the catalog.
pub fn count_movies(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(|e| Error::database(e.to_string()))
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

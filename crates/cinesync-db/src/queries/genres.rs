//! Genre query operations.

use cinesync_common::{Error, MovieId, Result};
use rusqlite::Connection;

use super::id_column;
use crate::models::Genre;

/// Tag a movie with a genre. Adding an existing (movie, name) pair is a no-op.
pub fn add_movie_genre(
    conn: &Connection,
    movie_id: MovieId,
    tmdb_genre_id: Option<i64>,
    name: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO movie_genres (movie_id, tmdb_genre_id, name) VALUES (?, ?, ?)
         ON CONFLICT(movie_id, name) DO NOTHING",
        rusqlite::params![movie_id.to_string(), tmdb_genre_id, name],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// List a movie's genres by name.
pub fn list_movie_genres(conn: &Connection, movie_id: MovieId) -> Result<Vec<Genre>> {
    let mut stmt = conn
        .prepare("SELECT movie_id, tmdb_genre_id, name FROM movie_genres WHERE movie_id = ? ORDER BY name")
        .map_err(|e| Error::database(e.to_string()))?;

    let genres = stmt
        .query_map([movie_id.to_string()], |row| {
            Ok(Genre {
                movie_id: id_column(row, 0)?,
                tmdb_genre_id: row.get(1)?,
                name: row.get(2)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMovie;
    use crate::pool::init_memory_pool;
    use crate::queries::movies::create_movie;

    #[test]
    fn test_add_is_idempotent() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let movie = create_movie(&conn, &NewMovie::titled("Heat")).unwrap();

        add_movie_genre(&conn, movie.id, Some(80), "Crime").unwrap();
        add_movie_genre(&conn, movie.id, None, "Crime").unwrap();
        add_movie_genre(&conn, movie.id, Some(18), "Drama").unwrap();

        let genres = list_movie_genres(&conn, movie.id).unwrap();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[0].name, "Crime");
        assert_eq!(genres[0].tmdb_genre_id, Some(80));
    }
}

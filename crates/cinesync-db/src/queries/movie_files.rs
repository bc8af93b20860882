//! Movie file query operations.
//!
//! A file path maps to at most one record. Files synced from Radarr also
//! carry Radarr's file ID, which is unique when present.

use chrono::Utc;
use cinesync_common::{Error, MovieFileId, MovieId, Result};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::{id_column, timestamp_column};
use crate::models::{MovieFile, NewMovieFile};

const FILE_COLUMNS: &str = "id, movie_id, file_path, file_size, container, resolution,
    quality_profile, video_codec, audio_codec, bitrate_kbps, radarr_file_id, created_at, updated_at";

fn parse_file_row(row: &rusqlite::Row) -> rusqlite::Result<MovieFile> {
    Ok(MovieFile {
        id: id_column(row, 0)?,
        movie_id: id_column(row, 1)?,
        file_path: row.get(2)?,
        file_size: row.get(3)?,
        container: row.get(4)?,
        resolution: row.get(5)?,
        quality_profile: row.get(6)?,
        video_codec: row.get(7)?,
        audio_codec: row.get(8)?,
        bitrate_kbps: row.get(9)?,
        radarr_file_id: row.get(10)?,
        created_at: timestamp_column(row, 11)?,
        updated_at: timestamp_column(row, 12)?,
    })
}

/// Create a new file record for a movie.
pub fn create_movie_file(conn: &Connection, new: &NewMovieFile) -> Result<MovieFile> {
    let id = MovieFileId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO movie_files (id, movie_id, file_path, file_size, container, resolution,
                quality_profile, video_codec, audio_codec, bitrate_kbps, radarr_file_id,
                created_at, updated_at)
         VALUES (:id, :movie_id, :file_path, :file_size, :container, :resolution,
                :quality_profile, :video_codec, :audio_codec, :bitrate_kbps, :radarr_file_id,
                :now, :now)",
        named_params! {
            ":id": id.to_string(),
            ":movie_id": new.movie_id.to_string(),
            ":file_path": &new.file_path,
            ":file_size": new.file_size,
            ":container": &new.container,
            ":resolution": &new.resolution,
            ":quality_profile": &new.quality_profile,
            ":video_codec": &new.video_codec,
            ":audio_codec": &new.audio_codec,
            ":bitrate_kbps": new.bitrate_kbps,
            ":radarr_file_id": new.radarr_file_id,
            ":now": now.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(MovieFile {
        id,
        movie_id: new.movie_id,
        file_path: new.file_path.clone(),
        file_size: new.file_size,
        container: new.container.clone(),
        resolution: new.resolution.clone(),
        quality_profile: new.quality_profile.clone(),
        video_codec: new.video_codec.clone(),
        audio_codec: new.audio_codec.clone(),
        bitrate_kbps: new.bitrate_kbps,
        radarr_file_id: new.radarr_file_id,
        created_at: now,
        updated_at: now,
    })
}

/// Update a file record. Path, size and owner are always written; optional
/// media details only when `Some`.
pub fn update_movie_file(
    conn: &Connection,
    id: MovieFileId,
    new: &NewMovieFile,
) -> Result<MovieFile> {
    let affected = conn
        .execute(
            "UPDATE movie_files SET
                movie_id = :movie_id,
                file_path = :file_path,
                file_size = :file_size,
                container = COALESCE(:container, container),
                resolution = COALESCE(:resolution, resolution),
                quality_profile = COALESCE(:quality_profile, quality_profile),
                video_codec = COALESCE(:video_codec, video_codec),
                audio_codec = COALESCE(:audio_codec, audio_codec),
                bitrate_kbps = COALESCE(:bitrate_kbps, bitrate_kbps),
                radarr_file_id = COALESCE(:radarr_file_id, radarr_file_id),
                updated_at = :now
             WHERE id = :id",
            named_params! {
                ":id": id.to_string(),
                ":movie_id": new.movie_id.to_string(),
                ":file_path": &new.file_path,
                ":file_size": new.file_size,
                ":container": &new.container,
                ":resolution": &new.resolution,
                ":quality_profile": &new.quality_profile,
                ":video_codec": &new.video_codec,
                ":audio_codec": &new.audio_codec,
                ":bitrate_kbps": new.bitrate_kbps,
                ":radarr_file_id": new.radarr_file_id,
                ":now": Utc::now().to_rfc3339(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Err(Error::not_found(format!("movie_file {id}")));
    }

    get_movie_file(conn, id)?.ok_or_else(|| Error::not_found(format!("movie_file {id}")))
}

fn get_one(
    conn: &Connection,
    filter: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<MovieFile>> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM movie_files WHERE {filter} = ?"),
        rusqlite::params![value],
        parse_file_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a file record by ID.
pub fn get_movie_file(conn: &Connection, id: MovieFileId) -> Result<Option<MovieFile>> {
    get_one(conn, "id", &id.to_string())
}

/// Get a file record by its path on disk.
pub fn get_movie_file_by_path(conn: &Connection, path: &str) -> Result<Option<MovieFile>> {
    get_one(conn, "file_path", &path)
}

/// Get a file record by Radarr's file ID.
pub fn get_movie_file_by_radarr_id(
    conn: &Connection,
    radarr_file_id: i64,
) -> Result<Option<MovieFile>> {
    get_one(conn, "radarr_file_id", &radarr_file_id)
}

/// Whether any file record exists at `path`.
pub fn movie_file_exists(conn: &Connection, path: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM movie_files WHERE file_path = ?)",
        [path],
        |row| row.get::<_, bool>(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// List all file records for a movie.
pub fn list_movie_files(conn: &Connection, movie_id: MovieId) -> Result<Vec<MovieFile>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM movie_files WHERE movie_id = ? ORDER BY file_path"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let files = stmt
        .query_map([movie_id.to_string()], parse_file_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMovie;
    use crate::pool::init_memory_pool;
    use crate::queries::movies::create_movie;

    #[test]
    fn test_create_and_lookup() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let movie = create_movie(&conn, &NewMovie::titled("Heat")).unwrap();

        let mut new = NewMovieFile::new(movie.id, "/movies/Heat (1995)/Heat.mkv", 42);
        new.radarr_file_id = Some(7);
        let file = create_movie_file(&conn, &new).unwrap();

        let by_path = get_movie_file_by_path(&conn, "/movies/Heat (1995)/Heat.mkv")
            .unwrap()
            .unwrap();
        assert_eq!(by_path.id, file.id);
        assert_eq!(get_movie_file_by_radarr_id(&conn, 7).unwrap().unwrap().id, file.id);
        assert!(movie_file_exists(&conn, "/movies/Heat (1995)/Heat.mkv").unwrap());
        assert!(!movie_file_exists(&conn, "/movies/other.mkv").unwrap());
    }

    #[test]
    fn test_path_is_unique() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let movie = create_movie(&conn, &NewMovie::titled("Heat")).unwrap();

        create_movie_file(&conn, &NewMovieFile::new(movie.id, "/m/a.mkv", 1)).unwrap();
        assert!(create_movie_file(&conn, &NewMovieFile::new(movie.id, "/m/a.mkv", 1)).is_err());
    }

    #[test]
    fn test_requires_existing_movie() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let orphan = NewMovieFile::new(MovieId::new(), "/m/a.mkv", 1);
        assert!(create_movie_file(&conn, &orphan).is_err());
    }

    #[test]
    fn test_update_file() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let movie = create_movie(&conn, &NewMovie::titled("Heat")).unwrap();
        let mut new = NewMovieFile::new(movie.id, "/m/a.mkv", 1);
        new.video_codec = Some("h264".to_string());
        let file = create_movie_file(&conn, &new).unwrap();

        let moved = NewMovieFile::new(movie.id, "/m/b.mkv", 2);
        let updated = update_movie_file(&conn, file.id, &moved).unwrap();

        assert_eq!(updated.file_path, "/m/b.mkv");
        assert_eq!(updated.file_size, 2);
        assert_eq!(updated.video_codec.as_deref(), Some("h264"));
        assert_eq!(list_movie_files(&conn, movie.id).unwrap().len(), 1);
    }
}

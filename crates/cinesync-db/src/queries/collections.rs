//! Collection query operations.

use chrono::Utc;
use cinesync_common::{CollectionId, Error, MovieId, Result};
use rusqlite::{named_params, Connection, OptionalExtension};

use super::{id_column, timestamp_column};
use crate::models::{Collection, NewCollection};

const COLLECTION_COLUMNS: &str =
    "id, tmdb_collection_id, name, overview, poster_path, backdrop_path, created_at, updated_at";

fn parse_collection_row(row: &rusqlite::Row) -> rusqlite::Result<Collection> {
    Ok(Collection {
        id: id_column(row, 0)?,
        tmdb_collection_id: row.get(1)?,
        name: row.get(2)?,
        overview: row.get(3)?,
        poster_path: row.get(4)?,
        backdrop_path: row.get(5)?,
        created_at: timestamp_column(row, 6)?,
        updated_at: timestamp_column(row, 7)?,
    })
}

/// Create a new collection.
pub fn create_collection(conn: &Connection, new: &NewCollection) -> Result<Collection> {
    let id = CollectionId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO movie_collections (id, tmdb_collection_id, name, overview, poster_path,
                backdrop_path, created_at, updated_at)
         VALUES (:id, :tmdb_collection_id, :name, :overview, :poster_path, :backdrop_path,
                :now, :now)",
        named_params! {
            ":id": id.to_string(),
            ":tmdb_collection_id": new.tmdb_collection_id,
            ":name": &new.name,
            ":overview": &new.overview,
            ":poster_path": &new.poster_path,
            ":backdrop_path": &new.backdrop_path,
            ":now": now.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Collection {
        id,
        tmdb_collection_id: new.tmdb_collection_id,
        name: new.name.clone(),
        overview: new.overview.clone(),
        poster_path: new.poster_path.clone(),
        backdrop_path: new.backdrop_path.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Update a collection. The name is always written; other fields only when `Some`.
pub fn update_collection(
    conn: &Connection,
    id: CollectionId,
    new: &NewCollection,
) -> Result<Collection> {
    let affected = conn
        .execute(
            "UPDATE movie_collections SET
                name = :name,
                tmdb_collection_id = COALESCE(:tmdb_collection_id, tmdb_collection_id),
                overview = COALESCE(:overview, overview),
                poster_path = COALESCE(:poster_path, poster_path),
                backdrop_path = COALESCE(:backdrop_path, backdrop_path),
                updated_at = :now
             WHERE id = :id",
            named_params! {
                ":id": id.to_string(),
                ":name": &new.name,
                ":tmdb_collection_id": new.tmdb_collection_id,
                ":overview": &new.overview,
                ":poster_path": &new.poster_path,
                ":backdrop_path": &new.backdrop_path,
                ":now": Utc::now().to_rfc3339(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Err(Error::not_found(format!("collection {id}")));
    }

    get_collection(conn, id)?.ok_or_else(|| Error::not_found(format!("collection {id}")))
}

/// Get a collection by ID.
pub fn get_collection(conn: &Connection, id: CollectionId) -> Result<Option<Collection>> {
    conn.query_row(
        &format!("SELECT {COLLECTION_COLUMNS} FROM movie_collections WHERE id = ?"),
        [id.to_string()],
        parse_collection_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a collection by its TMDB collection ID.
pub fn get_collection_by_tmdb_id(conn: &Connection, tmdb_id: i64) -> Result<Option<Collection>> {
    conn.query_row(
        &format!("SELECT {COLLECTION_COLUMNS} FROM movie_collections WHERE tmdb_collection_id = ?"),
        [tmdb_id],
        parse_collection_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Link a movie to a collection. Linking twice is a no-op apart from the order.
pub fn add_movie_to_collection(
    conn: &Connection,
    collection_id: CollectionId,
    movie_id: MovieId,
    order: Option<i32>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO movie_collection_members (collection_id, movie_id, collection_order)
         VALUES (?, ?, ?)
         ON CONFLICT(collection_id, movie_id)
         DO UPDATE SET collection_order = COALESCE(excluded.collection_order, collection_order)",
        rusqlite::params![collection_id.to_string(), movie_id.to_string(), order],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Collections a movie belongs to.
pub fn list_collections_for_movie(conn: &Connection, movie_id: MovieId) -> Result<Vec<Collection>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.tmdb_collection_id, c.name, c.overview, c.poster_path,
                    c.backdrop_path, c.created_at, c.updated_at
             FROM movie_collections c
             JOIN movie_collection_members m ON m.collection_id = c.id
             WHERE m.movie_id = ?
             ORDER BY c.name",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let collections = stmt
        .query_map([movie_id.to_string()], parse_collection_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(collections)
}

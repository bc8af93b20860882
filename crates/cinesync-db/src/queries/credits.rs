//! Credit query operations.

use chrono::Utc;
use cinesync_common::{CreditId, CreditType, Error, MovieId, Result};
use rusqlite::{named_params, types::Type, Connection};

use super::{id_column, timestamp_column};
use crate::models::{Credit, NewCredit};

fn parse_credit_row(row: &rusqlite::Row) -> rusqlite::Result<Credit> {
    let credit_type: String = row.get(4)?;
    Ok(Credit {
        id: id_column(row, 0)?,
        movie_id: id_column(row, 1)?,
        tmdb_person_id: row.get(2)?,
        name: row.get(3)?,
        credit_type: credit_type.parse::<CreditType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
        })?,
        character: row.get(5)?,
        job: row.get(6)?,
        department: row.get(7)?,
        billing_order: row.get(8)?,
        profile_path: row.get(9)?,
        created_at: timestamp_column(row, 10)?,
    })
}

/// Create a credit on a movie.
pub fn create_credit(conn: &Connection, new: &NewCredit) -> Result<Credit> {
    let id = CreditId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO movie_credits (id, movie_id, tmdb_person_id, name, credit_type, character,
                job, department, billing_order, profile_path, created_at)
         VALUES (:id, :movie_id, :tmdb_person_id, :name, :credit_type, :character,
                :job, :department, :billing_order, :profile_path, :now)",
        named_params! {
            ":id": id.to_string(),
            ":movie_id": new.movie_id.to_string(),
            ":tmdb_person_id": new.tmdb_person_id,
            ":name": &new.name,
            ":credit_type": new.credit_type.to_string(),
            ":character": &new.character,
            ":job": &new.job,
            ":department": &new.department,
            ":billing_order": new.billing_order,
            ":profile_path": &new.profile_path,
            ":now": now.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Credit {
        id,
        movie_id: new.movie_id,
        tmdb_person_id: new.tmdb_person_id,
        name: new.name.clone(),
        credit_type: new.credit_type,
        character: new.character.clone(),
        job: new.job.clone(),
        department: new.department.clone(),
        billing_order: new.billing_order,
        profile_path: new.profile_path.clone(),
        created_at: now,
    })
}

/// List credits for a movie, cast before crew, in billing order.
pub fn list_credits(conn: &Connection, movie_id: MovieId) -> Result<Vec<Credit>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, movie_id, tmdb_person_id, name, credit_type, character, job,
                    department, billing_order, profile_path, created_at
             FROM movie_credits WHERE movie_id = ?
             ORDER BY credit_type ASC, billing_order IS NULL, billing_order ASC, name ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let credits = stmt
        .query_map([movie_id.to_string()], parse_credit_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(credits)
}

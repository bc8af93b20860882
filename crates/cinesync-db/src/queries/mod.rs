//! Database query modules.
//!
//! - movies: Movie CRUD, lookups by external ID, title search
//! - movie_files: Files attached to movies
//! - collections: Collections and membership links
//! - credits: Cast and crew
//! - genres: Genre tags

pub mod collections;
pub mod credits;
pub mod genres;
pub mod movie_files;
pub mod movies;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a typed ID stored as a UUID string.
pub(crate) fn id_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read an RFC 3339 timestamp column.
pub(crate) fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read an optional `YYYY-MM-DD` date column. Malformed dates read as `None`.
pub(crate) fn date_column(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()))
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

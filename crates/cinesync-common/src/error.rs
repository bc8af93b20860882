//! Catalog store errors.
//!
//! Lookups report absence as `Ok(None)`. [`Error::NotFound`] only comes from
//! writes that address a row which must exist (updates, links).

/// Failure of a catalog store operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The addressed row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// SQLite, the pool or a migration failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl Error {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

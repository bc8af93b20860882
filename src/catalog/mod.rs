//! Access to the local movie catalog.
//!
//! The reconcilers talk to the catalog only through [`CatalogRepository`].
//! [`SqliteCatalog`] is the production implementation over `cinesync-db`.

mod repository;

pub use repository::{CatalogRepository, SqliteCatalog};

pub use cinesync_db::models::{
    Collection, Credit, Genre, Movie, MovieFile, NewCollection, NewCredit, NewMovie, NewMovieFile,
};

use async_trait::async_trait;
use cinesync_common::{CollectionId, MovieFileId, MovieId, Result};
use cinesync_db::pool::{get_conn, DbPool};
use cinesync_db::queries::{collections, credits, genres, movie_files, movies};

use super::{
    Collection, Credit, Genre, Movie, MovieFile, NewCollection, NewCredit, NewMovie, NewMovieFile,
};

// ---------------------------------------------------------------------------
// Repository trait
// ---------------------------------------------------------------------------

/// CRUD access to the catalog and its sub-resources.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` always means the
/// store itself failed.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Movies
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>>;
    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>>;
    async fn get_movie_by_radarr_id(&self, radarr_id: i64) -> Result<Option<Movie>>;
    /// Bounded title search over title and original title.
    async fn search_movies_by_title(&self, title: &str, limit: u32) -> Result<Vec<Movie>>;
    async fn list_movies(&self, limit: u32, offset: u32) -> Result<Vec<Movie>>;
    async fn count_movies(&self) -> Result<u64>;
    async fn create_movie(&self, movie: &NewMovie) -> Result<Movie>;
    async fn update_movie(&self, id: MovieId, movie: &NewMovie) -> Result<Movie>;

    // Files
    async fn create_movie_file(&self, file: &NewMovieFile) -> Result<MovieFile>;
    async fn update_movie_file(&self, id: MovieFileId, file: &NewMovieFile) -> Result<MovieFile>;
    async fn get_movie_file_by_path(&self, path: &str) -> Result<Option<MovieFile>>;
    async fn get_movie_file_by_radarr_id(&self, radarr_file_id: i64)
        -> Result<Option<MovieFile>>;
    async fn movie_file_exists(&self, path: &str) -> Result<bool>;
    async fn list_movie_files(&self, movie_id: MovieId) -> Result<Vec<MovieFile>>;

    // Collections
    async fn get_collection_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Collection>>;
    async fn create_collection(&self, collection: &NewCollection) -> Result<Collection>;
    async fn update_collection(
        &self,
        id: CollectionId,
        collection: &NewCollection,
    ) -> Result<Collection>;
    async fn add_movie_to_collection(
        &self,
        collection_id: CollectionId,
        movie_id: MovieId,
    ) -> Result<()>;
    async fn list_collections_for_movie(&self, movie_id: MovieId) -> Result<Vec<Collection>>;

    // Credits and genres
    async fn create_credit(&self, credit: &NewCredit) -> Result<Credit>;
    async fn list_credits(&self, movie_id: MovieId) -> Result<Vec<Credit>>;
    async fn add_movie_genre(
        &self,
        movie_id: MovieId,
        tmdb_genre_id: Option<i64>,
        name: &str,
    ) -> Result<()>;
    async fn list_movie_genres(&self, movie_id: MovieId) -> Result<Vec<Genre>>;
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// [`CatalogRepository`] backed by the SQLite pool.
///
/// Each call checks out one connection and returns it before yielding, so
/// callers never hold a connection across an await point.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: DbPool,
}

impl SqliteCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        movies::get_movie(&*get_conn(&self.pool)?, id)
    }

    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>> {
        movies::get_movie_by_tmdb_id(&*get_conn(&self.pool)?, tmdb_id)
    }

    async fn get_movie_by_radarr_id(&self, radarr_id: i64) -> Result<Option<Movie>> {
        movies::get_movie_by_radarr_id(&*get_conn(&self.pool)?, radarr_id)
    }

    async fn search_movies_by_title(&self, title: &str, limit: u32) -> Result<Vec<Movie>> {
        movies::search_movies_by_title(&*get_conn(&self.pool)?, title, limit)
    }

    async fn list_movies(&self, limit: u32, offset: u32) -> Result<Vec<Movie>> {
        movies::list_movies(&*get_conn(&self.pool)?, limit, offset)
    }

    async fn count_movies(&self) -> Result<u64> {
        movies::count_movies(&*get_conn(&self.pool)?)
    }

    async fn create_movie(&self, movie: &NewMovie) -> Result<Movie> {
        movies::create_movie(&*get_conn(&self.pool)?, movie)
    }

    async fn update_movie(&self, id: MovieId, movie: &NewMovie) -> Result<Movie> {
        movies::update_movie(&*get_conn(&self.pool)?, id, movie)
    }

    async fn create_movie_file(&self, file: &NewMovieFile) -> Result<MovieFile> {
        movie_files::create_movie_file(&*get_conn(&self.pool)?, file)
    }

    async fn update_movie_file(&self, id: MovieFileId, file: &NewMovieFile) -> Result<MovieFile> {
        movie_files::update_movie_file(&*get_conn(&self.pool)?, id, file)
    }

    async fn get_movie_file_by_path(&self, path: &str) -> Result<Option<MovieFile>> {
        movie_files::get_movie_file_by_path(&*get_conn(&self.pool)?, path)
    }

    async fn get_movie_file_by_radarr_id(
        &self,
        radarr_file_id: i64,
    ) -> Result<Option<MovieFile>> {
        movie_files::get_movie_file_by_radarr_id(&*get_conn(&self.pool)?, radarr_file_id)
    }

    async fn movie_file_exists(&self, path: &str) -> Result<bool> {
        movie_files::movie_file_exists(&*get_conn(&self.pool)?, path)
    }

    async fn list_movie_files(&self, movie_id: MovieId) -> Result<Vec<MovieFile>> {
        movie_files::list_movie_files(&*get_conn(&self.pool)?, movie_id)
    }

    async fn get_collection_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Collection>> {
        collections::get_collection_by_tmdb_id(&*get_conn(&self.pool)?, tmdb_id)
    }

    async fn create_collection(&self, collection: &NewCollection) -> Result<Collection> {
        collections::create_collection(&*get_conn(&self.pool)?, collection)
    }

    async fn update_collection(
        &self,
        id: CollectionId,
        collection: &NewCollection,
    ) -> Result<Collection> {
        collections::update_collection(&*get_conn(&self.pool)?, id, collection)
    }

    async fn add_movie_to_collection(
        &self,
        collection_id: CollectionId,
        movie_id: MovieId,
    ) -> Result<()> {
        collections::add_movie_to_collection(&*get_conn(&self.pool)?, collection_id, movie_id, None)
    }

    async fn list_collections_for_movie(&self, movie_id: MovieId) -> Result<Vec<Collection>> {
        collections::list_collections_for_movie(&*get_conn(&self.pool)?, movie_id)
    }

    async fn create_credit(&self, credit: &NewCredit) -> Result<Credit> {
        credits::create_credit(&*get_conn(&self.pool)?, credit)
    }

    async fn list_credits(&self, movie_id: MovieId) -> Result<Vec<Credit>> {
        credits::list_credits(&*get_conn(&self.pool)?, movie_id)
    }

    async fn add_movie_genre(
        &self,
        movie_id: MovieId,
        tmdb_genre_id: Option<i64>,
        name: &str,
    ) -> Result<()> {
        genres::add_movie_genre(&*get_conn(&self.pool)?, movie_id, tmdb_genre_id, name)
    }

    async fn list_movie_genres(&self, movie_id: MovieId) -> Result<Vec<Genre>> {
        genres::list_movie_genres(&*get_conn(&self.pool)?, movie_id)
    }
}

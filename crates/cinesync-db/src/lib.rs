//! Cinesync-DB: Catalog schema, migrations, and query operations
//!
//! This crate stores the movie catalog in SQLite using rusqlite and r2d2
//! connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use cinesync_db::models::NewMovie;
//! use cinesync_db::pool::{init_pool, get_conn};
//! use cinesync_db::queries::movies;
//!
//! let pool = init_pool("/var/lib/cinesync/catalog.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let movie = movies::create_movie(&conn, &NewMovie::titled("Heat")).unwrap();
//! println!("Created movie: {}", movie.title);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

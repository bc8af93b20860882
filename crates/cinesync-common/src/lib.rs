//! Cinesync-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across cinesync:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for movies, files, collections and credits
//! - **Core Types**: Enums for credit kinds
//! - **Path Utilities**: Functions to detect media files by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use cinesync_common::{MovieId, CreditType, Error, Result};
//! use cinesync_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let movie_id = MovieId::new();
//! let kind: CreditType = "cast".parse().unwrap();
//!
//! assert!(is_video_file(Path::new("movie.mkv")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("movie"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;

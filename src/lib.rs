//! Cinesync - movie catalog reconciliation
//!
//! Keeps a local movie catalog in step with two sources: files found on
//! disk (matched against TMDB) and the movies a Radarr instance manages.
//! This library crate exposes the engine for the CLI and integration tests.

pub mod arr;
pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod metadata;
pub mod scanner;

pub use error::{Error, ItemFailure, Result};

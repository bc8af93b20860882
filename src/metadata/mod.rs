//! Remote metadata lookup for movies the catalog does not know yet.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and the candidate type.
//! - [`providers`] -- Concrete provider implementations (TMDB).

pub mod provider;
pub mod providers;

pub use provider::{MetadataProvider, MovieCandidate};
pub use providers::TmdbProvider;

//! Filesystem-driven reconciliation.
//!
//! - [`matcher`] resolves one scan result to zero or one catalog movie.
//! - [`reconciler`] runs the scanner and matcher over a whole library, or a
//!   single file on demand.
//! - [`scoring`] holds the confidence arithmetic both rely on.

pub mod matcher;
pub mod reconciler;
pub mod scoring;
pub mod types;

pub use matcher::Matcher;
pub use reconciler::LibraryReconciler;
pub use types::{MatchError, MatchResult, MatchType, ScanSummary};

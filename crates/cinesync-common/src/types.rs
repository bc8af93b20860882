//! Core type definitions shared by the catalog and the reconcilers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of movie credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditType {
    /// An on-screen role.
    Cast,
    /// A production role (director, writer, ...).
    Crew,
}

impl fmt::Display for CreditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cast => write!(f, "cast"),
            Self::Crew => write!(f, "crew"),
        }
    }
}

impl std::str::FromStr for CreditType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cast" => Ok(Self::Cast),
            "crew" => Ok(Self::Crew),
            _ => Err(format!("Invalid credit type: {}", s)),
        }
    }
}

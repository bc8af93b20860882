//! Typed ID wrappers for catalog records.
//!
//! Newtypes around UUIDs so a `MovieFileId` can never be passed where a
//! `MovieId` is expected. IDs are stored as hyphenated strings in SQLite and
//! parsed back through [`std::str::FromStr`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Unique identifier for a catalog movie.
    MovieId
);

typed_id!(
    /// Unique identifier for a file attached to a movie.
    MovieFileId
);

typed_id!(
    /// Unique identifier for a movie collection.
    CollectionId
);

typed_id!(
    /// Unique identifier for a cast or crew credit.
    CreditId
);

//! User-owned collection kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named set of wine identifiers owned by a user.
///
/// Each kind maps to its own set of `/WineUser` endpoints; the
/// synchronizer is instantiated once per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Wines the user has marked as favorites. Order-irrelevant.
    Favorites,
    /// Wines the user has viewed. Server order reflects recency.
    History,
}

impl CollectionKind {
    /// The path segment used by the remote API for this kind.
    #[must_use]
    pub fn endpoint_segment(self) -> &'static str {
        match self {
            Self::Favorites => "favorite",
            Self::History => "history",
        }
    }

    /// The path segment for listing this collection's members.
    #[must_use]
    pub fn list_segment(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::History => "history",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorites => write!(f, "favorites"),
            Self::History => write!(f, "history"),
        }
    }
}

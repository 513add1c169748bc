//! Strongly typed identifiers shared across the model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of one anime record in the feed.
///
/// Used both for a record's own id and for the foreign id carried by a
/// related-anime link, so graph edges can only ever point at anime.
///
/// # Examples
///
/// ```rust
/// use anigraph::domain::AnimeId;
///
/// let id: AnimeId = "42".parse().unwrap();
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnimeId(u32);

impl AnimeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnimeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<AnimeId> for u32 {
    fn from(id: AnimeId) -> Self {
        id.0
    }
}

impl From<u32> for AnimeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

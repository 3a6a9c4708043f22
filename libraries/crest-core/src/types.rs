//! Core entity types

use crate::error::UidError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric entity identity in the entity cache
pub type EntityId = i64;

/// Entity category
///
/// The entity cache is keyed by `(kind, id)`; the kind disambiguates the
/// id namespaces of the different entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A single track
    Track,
    /// A collection of tracks (playlist or album)
    Collection,
    /// A user profile
    User,
}

impl Kind {
    /// Stable string form used in encoded identifiers
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Track => "track",
            Kind::Collection => "collection",
            Kind::User => "user",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(Kind::Track),
            "collection" => Ok(Kind::Collection),
            "user" => Ok(Kind::User),
            _ => Err(UidError::InvalidComponent {
                component: "kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Cache identity of an entity: `(kind, id)`
///
/// This is the only identity the entity cache knows. Occurrence-level
/// identity within a list is a [`crate::Uid`], which always collapses
/// back to an `EntryKey` for cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    /// Entity category
    pub kind: Kind,
    /// Numeric id within the kind's namespace
    pub id: EntityId,
}

impl EntryKey {
    /// Create an entry key
    pub fn new(kind: Kind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [Kind::Track, Kind::Collection, Kind::User] {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "album".parse::<Kind>().unwrap_err();
        assert!(matches!(
            err,
            UidError::InvalidComponent {
                component: "kind",
                ..
            }
        ));
    }

    #[test]
    fn entry_key_display() {
        let key = EntryKey::new(Kind::Collection, 907);
        assert_eq!(key.to_string(), "collection:907");
    }
}

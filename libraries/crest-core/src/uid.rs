//! Composite occurrence identifiers
//!
//! A [`Uid`] names one occurrence of an entity inside one list instance,
//! encoded as `{kind}:{id}:{source}:{count}`:
//!
//! - `kind`/`id` are the entity's cache identity
//! - `source` is the owning list instance's key; the playback queue
//!   compares it against a lineup's key to decide whether the playing
//!   item belongs to that lineup
//! - `count` disambiguates repeated occurrences of the same entity in
//!   one instance (a track appearing twice in a playlist)
//!
//! Instance keys legally embed the delimiter (`FEED:7`,
//! `FEED:7:collection:12`), so decoding anchors the fixed components at
//! both ends: the first two segments are `kind` and `id`, the last is
//! `count`, and everything between re-joins into `source`.
//!
//! UIDs are correlation identifiers only. The entity cache is keyed by
//! `(kind, id)`; a UID is never used as storage identity.

use crate::error::{Result, UidError};
use crate::types::{EntityId, EntryKey, Kind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between encoded UID components
pub const UID_DELIMITER: char = ':';

/// One occurrence of an entity within one list instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid {
    kind: Kind,
    id: EntityId,
    source: String,
    count: u32,
}

impl Uid {
    /// Create a UID, validating the free-form source component
    ///
    /// The source may embed the delimiter (composite instance keys do),
    /// but an empty source or one with a leading or trailing delimiter
    /// would not survive a decode round trip and is rejected with
    /// [`UidError::InvalidComponent`].
    pub fn new(kind: Kind, id: EntityId, source: impl Into<String>, count: u32) -> Result<Self> {
        let source = source.into();
        if source.is_empty()
            || source.starts_with(UID_DELIMITER)
            || source.ends_with(UID_DELIMITER)
        {
            return Err(UidError::InvalidComponent {
                component: "source",
                value: source,
            });
        }
        Ok(Self {
            kind,
            id,
            source,
            count,
        })
    }

    /// Entity category
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Owning list instance's key
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Occurrence disambiguator within the owning instance
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Cache identity of the referenced entity
    pub fn entry_key(&self) -> EntryKey {
        EntryKey::new(self.kind, self.id)
    }

    /// Rewrite only the source component
    ///
    /// Used when an entity list is re-hosted under a different instance,
    /// e.g. deep-linking into a specific lineup.
    pub fn with_source(&self, new_source: impl Into<String>) -> Result<Self> {
        Self::new(self.kind, self.id, new_source, self.count)
    }

    /// Whether this occurrence belongs to the given list instance
    pub fn belongs_to(&self, instance_key: &str) -> bool {
        self.source == instance_key
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{kind}{d}{id}{d}{source}{d}{count}",
            kind = self.kind,
            id = self.id,
            source = self.source,
            count = self.count,
            d = UID_DELIMITER
        )
    }
}

impl FromStr for Uid {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: &'static str| UidError::Malformed {
            uid: s.to_string(),
            reason,
        };

        let segments: Vec<&str> = s.split(UID_DELIMITER).collect();
        if segments.len() < 4 {
            return Err(malformed("expected kind:id:source:count"));
        }

        let kind: Kind = segments[0]
            .parse()
            .map_err(|_| malformed("unknown kind"))?;
        let id: EntityId = segments[1]
            .parse()
            .map_err(|_| malformed("id is not an integer"))?;
        let count: u32 = segments[segments.len() - 1]
            .parse()
            .map_err(|_| malformed("count is not an integer"))?;
        let source = segments[2..segments.len() - 1].join(&UID_DELIMITER.to_string());

        Self::new(kind, id, source, count).map_err(|_| malformed("degenerate source"))
    }
}

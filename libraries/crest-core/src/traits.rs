//! Core traits for the Crest client

use crate::types::{EntityId, EntryKey, Kind};

/// The minimal surface the feed engine requires of a fetched entity
///
/// The engine never stores entity payloads; it only reads the cache
/// identity off each fetched item to assign occurrence identifiers and
/// deduplicate. Writing the payloads into the entity cache is the
/// caller's job.
pub trait FeedEntry {
    /// Entity category
    fn kind(&self) -> Kind;

    /// Numeric identity within the kind's namespace
    fn id(&self) -> EntityId;

    /// Whether the backend has tombstoned this entity
    ///
    /// Lineups configured with `remove_deleted` prune these instead of
    /// listing them.
    fn is_deleted(&self) -> bool {
        false
    }

    /// Cache identity of this entity
    fn entry_key(&self) -> EntryKey {
        EntryKey::new(self.kind(), self.id())
    }
}

//! State and configuration types for the feed coordinators

use crate::error::{FeedError, Result};
use crest_core::{EntityId, EntryKey, Uid};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Per-instance load state machine
///
/// `Idle -> Loading -> {Success, Error}`; neither terminal state blocks
/// the next `load_more`, and `reset` always returns to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// No fetch has run since creation or the last reset
    #[default]
    Idle,
    /// A fetch is in flight; further `load_more` calls are no-ops
    Loading,
    /// The last fetch merged successfully
    Success,
    /// The last fetch failed; the cursor did not advance
    Error,
}

/// Pagination and ordering state of one lineup instance
///
/// State is ephemeral and in-memory only; it is created lazily with
/// these defaults the first time any operation touches its instance key
/// and mutated only by the owning coordinator.
#[derive(Debug, Clone, Serialize)]
pub struct LineupState {
    /// Presentation order of occurrence identifiers
    pub order: Vec<Uid>,

    /// Encoded UID strings, an exact mirror of `order`'s membership
    pub entry_ids: HashSet<String>,

    /// Present occurrences per `(kind, id)`, the dedup index
    pub entry_counts: HashMap<EntryKey, u32>,

    /// Next page to request; advances only on a successful fetch
    pub page: u32,

    /// Whether another page may exist
    pub has_more: bool,

    /// Load state machine position
    pub status: LoadStatus,

    /// Generation token; results fetched under an older epoch are discarded
    pub epoch: u64,
}

impl Default for LineupState {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entry_ids: HashSet::new(),
            entry_counts: HashMap::new(),
            page: 0,
            has_more: true,
            status: LoadStatus::Idle,
            epoch: 0,
        }
    }
}

impl LineupState {
    /// Whether any occurrence of this entity is present
    pub fn contains_entry(&self, key: &EntryKey) -> bool {
        self.entry_counts.contains_key(key)
    }

    /// Present occurrences of this entity
    pub fn occurrences(&self, key: &EntryKey) -> u32 {
        self.entry_counts.get(key).copied().unwrap_or(0)
    }

    /// Number of entries in presentation order
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the instance holds no entries
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cache identities of all present entries, in presentation order
    pub fn entry_keys(&self) -> Vec<EntryKey> {
        self.order.iter().map(Uid::entry_key).collect()
    }

    /// Count for the next occurrence of this entity
    ///
    /// One past the highest count ever present, so a removed occurrence
    /// can never be re-minted as a colliding UID.
    pub(crate) fn next_count(&self, key: &EntryKey) -> u32 {
        self.order
            .iter()
            .filter(|uid| uid.entry_key() == *key)
            .map(Uid::count)
            .max()
            .map_or(0, |count| count + 1)
    }

    /// Append an occurrence, keeping the mirrors consistent
    pub(crate) fn insert(&mut self, uid: Uid) {
        self.entry_ids.insert(uid.to_string());
        *self.entry_counts.entry(uid.entry_key()).or_insert(0) += 1;
        self.order.push(uid);
    }

    /// Remove one occurrence, keeping the mirrors consistent
    pub(crate) fn remove(&mut self, uid: &Uid) -> bool {
        let Some(position) = self.order.iter().position(|u| u == uid) else {
            return false;
        };
        self.order.remove(position);
        self.entry_ids.remove(&uid.to_string());

        let key = uid.entry_key();
        if let Some(count) = self.entry_counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.entry_counts.remove(&key);
            }
        }
        true
    }

    /// Drop all entries without touching the cursor or epoch
    pub(crate) fn clear_entries(&mut self) {
        self.order.clear();
        self.entry_ids.clear();
        self.entry_counts.clear();
    }

    /// Return to initial defaults and start a new generation
    ///
    /// In-flight fetches started under the old epoch will be discarded
    /// at resolution time.
    pub(crate) fn reset_data(&mut self) {
        self.clear_entries();
        self.page = 0;
        self.has_more = true;
        self.status = LoadStatus::Idle;
        self.epoch += 1;
    }
}

/// Pagination state of one user-list instance
///
/// The flat, single-kind sibling of [`LineupState`]: plain ids, no UID
/// codec involved.
#[derive(Debug, Clone, Serialize)]
pub struct UserListState {
    /// Ordered user ids, as returned by the fetches
    pub user_ids: Vec<EntityId>,

    /// Next page to request; advances only on a successful fetch
    pub page: u32,

    /// Requested batch size, set at registration and kept across resets
    pub page_size: usize,

    /// Whether another page may exist
    pub has_more: bool,

    /// Load state machine position
    pub status: LoadStatus,

    /// Generation token; results fetched under an older epoch are discarded
    pub epoch: u64,
}

impl Default for UserListState {
    fn default() -> Self {
        Self {
            user_ids: Vec::new(),
            page: 0,
            page_size: 0,
            has_more: true,
            status: LoadStatus::Idle,
            epoch: 0,
        }
    }
}

impl UserListState {
    /// Return to initial defaults and start a new generation
    ///
    /// The configured `page_size` survives; only accumulated data clears.
    pub(crate) fn reset_data(&mut self) {
        self.user_ids.clear();
        self.page = 0;
        self.has_more = true;
        self.status = LoadStatus::Idle;
        self.epoch += 1;
    }
}

/// One page of a user-list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Ids in presentation order, assumed server-deduplicated
    pub user_ids: Vec<EntityId>,
    /// Whether the server reports another page
    pub has_more: bool,
}

/// Configuration for one lineup coordinator
///
/// Supplied once at construction; the dynamic parts (fetch function,
/// source selector, reconcile hook) are separate collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct LineupConfig {
    /// Static instance-key prefix, e.g. `"TRENDING_WEEK"`
    pub prefix: String,

    /// Requested batch size per page
    pub page_size: usize,

    /// Drop cross-page repeats of the same `(kind, id)` instead of
    /// counting them as further occurrences
    pub dedupe: bool,

    /// Prune entities the backend has tombstoned
    pub remove_deleted: bool,
}

impl LineupConfig {
    /// Create a configuration with the default flags
    /// (`dedupe = false`, `remove_deleted = true`)
    pub fn new(prefix: impl Into<String>, page_size: usize) -> Self {
        Self {
            prefix: prefix.into(),
            page_size,
            dedupe: false,
            remove_deleted: true,
        }
    }

    /// Set the dedupe flag
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Set the deleted-entry pruning flag
    pub fn with_remove_deleted(mut self, remove_deleted: bool) -> Self {
        self.remove_deleted = remove_deleted;
        self
    }

    /// Reject unusable configurations
    ///
    /// Called at coordinator construction; a bad configuration is a
    /// programmer error and fails fast rather than being defended
    /// against at every operation.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(FeedError::InvalidConfig("prefix must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(FeedError::InvalidConfig("page_size must be positive".into()));
        }
        Ok(())
    }
}

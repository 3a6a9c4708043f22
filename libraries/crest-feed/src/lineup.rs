//! Lineup coordinator
//!
//! Drives paginated, deduplicated, order-preserving fetches of
//! mixed-kind content. One coordinator definition can back many
//! isolated instances: the instance key is the static prefix, optionally
//! replaced by a dynamically computed key (e.g. `PROFILE_FEED:7` for the
//! currently viewed profile), and each key owns an independent cursor.
//!
//! The coordinator owns cursor state and occurrence identity only. The
//! fetch itself is fully delegated to a [`LineupSource`], and writing
//! fetched entity payloads into the entity cache is the caller's job;
//! every feed in the client shares identical cursor and anti-duplicate
//! behavior while only the source and the optional reconcile hook vary.

use crate::error::{FeedError, Result};
use crate::source::{LineupSource, Reconcile};
use crate::store::StateStore;
use crate::types::{LineupConfig, LineupState, LoadStatus};
use crest_core::{EntryKey, FeedEntry, Uid};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

type SourceSelect = dyn Fn() -> String + Send + Sync;

/// Result of a [`Lineup::load_more`] or [`Lineup::refresh`] call
///
/// The appended entries come back paired with their assigned UIDs so the
/// caller can populate the entity cache (the coordinator never stores
/// payloads).
#[derive(Debug)]
pub enum LoadOutcome<E> {
    /// The fetch merged into the instance
    Loaded {
        /// Entries actually appended, with their occurrence identifiers.
        /// Duplicates dropped by dedupe and pruned deletes are absent.
        entries: Vec<(Uid, E)>,
        /// Whether another page may exist
        has_more: bool,
    },

    /// A fetch was already in flight for this instance; nothing was done
    AlreadyLoading,

    /// The instance was reset or replaced while the fetch was in flight;
    /// the result was discarded
    Stale,
}

/// Coordinator for one family of paginated content lists
pub struct Lineup<S: LineupSource> {
    config: LineupConfig,
    source: Arc<S>,
    source_select: Option<Arc<SourceSelect>>,
    reconcile: Option<Arc<dyn Reconcile<S::Entry>>>,
    states: Arc<RwLock<StateStore<LineupState>>>,
}

impl<S: LineupSource> Clone for Lineup<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: Arc::clone(&self.source),
            source_select: self.source_select.clone(),
            reconcile: self.reconcile.clone(),
            states: Arc::clone(&self.states),
        }
    }
}

impl<S: LineupSource> Lineup<S> {
    /// Create a coordinator
    ///
    /// Fails fast with [`FeedError::InvalidConfig`] on an unusable
    /// configuration.
    pub fn new(config: LineupConfig, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: Arc::new(source),
            source_select: None,
            reconcile: None,
            states: Arc::new(RwLock::new(StateStore::new())),
        })
    }

    /// Install a dynamic instance-key selector
    ///
    /// Evaluated at dispatch time; without one, the coordinator is a
    /// single global instance keyed by its prefix. Conventionally the
    /// selector returns `prefix:context`, e.g. the viewed profile's id.
    pub fn with_source_selector(
        mut self,
        select: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.source_select = Some(Arc::new(select));
        self
    }

    /// Install an optimistic-merge hook
    pub fn with_reconcile(mut self, reconcile: impl Reconcile<S::Entry> + 'static) -> Self {
        self.reconcile = Some(Arc::new(reconcile));
        self
    }

    /// Static prefix of this coordinator
    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Configured batch size
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Instance key at this moment
    pub fn instance_key(&self) -> String {
        match &self.source_select {
            Some(select) => select(),
            None => self.config.prefix.clone(),
        }
    }

    /// Snapshot of the current instance's state
    pub fn state(&self) -> LineupState {
        self.state_for(&self.instance_key())
    }

    /// Snapshot of an arbitrary instance's state
    ///
    /// Untouched keys report the defaults (empty, `Idle`).
    pub fn state_for(&self, instance_key: &str) -> LineupState {
        self.states.read().unwrap().snapshot(instance_key)
    }

    /// Cache identities of the current instance's entries, in order
    ///
    /// This is what callers use to populate or read the entity cache.
    pub fn entry_keys(&self) -> Vec<EntryKey> {
        self.state().entry_keys()
    }

    /// Fetch and merge the next page for the current instance
    ///
    /// At most one fetch is logically in flight per instance key: a call
    /// while one is pending is a no-op (`AlreadyLoading`), which guards
    /// against duplicate triggers from scroll-edge re-entrancy. On fetch
    /// failure the instance moves to `Error` with its cursor untouched
    /// and the error is returned; retrying is just calling again. A
    /// result arriving after the instance was reset is discarded
    /// (`Stale`).
    pub async fn load_more(&self, payload: Value) -> Result<LoadOutcome<S::Entry>> {
        // The key is captured at dispatch time: a fetch issued while
        // viewing context A files under A even if the selector has moved
        // on by the time it resolves.
        let instance_key = self.instance_key();
        let (page, epoch, offset, limit) = {
            let mut states = self.states.write().unwrap();
            let state = states.entry(&instance_key);
            if state.status == LoadStatus::Loading {
                debug!(lineup = %instance_key, "load_more ignored, fetch already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            state.status = LoadStatus::Loading;
            let offset = state.page as usize * self.config.page_size;
            (state.page, state.epoch, offset, self.config.page_size)
        };

        debug!(lineup = %instance_key, page, offset, limit, "dispatching lineup fetch");
        let fetched = self.source.fetch_page(offset, limit, &payload).await;

        let mut states = self.states.write().unwrap();
        let state = states.entry(&instance_key);
        if state.epoch != epoch {
            debug!(lineup = %instance_key, "discarding stale lineup fetch");
            return Ok(LoadOutcome::Stale);
        }

        let raw = match fetched {
            Ok(raw) => raw,
            Err(err) => {
                state.status = LoadStatus::Error;
                warn!(lineup = %instance_key, error = %err, "lineup fetch failed");
                return Err(FeedError::Fetch(err));
            }
        };

        let raw_len = raw.len();
        let entries = match &self.reconcile {
            Some(hook) => hook.reconcile(raw, state),
            None => raw,
        };
        let entries = self.merge_entries(state, &instance_key, entries)?;

        state.page += 1;
        state.has_more = raw_len == limit;
        state.status = LoadStatus::Success;
        debug!(
            lineup = %instance_key,
            appended = entries.len(),
            page = state.page,
            has_more = state.has_more,
            "lineup fetch merged"
        );

        Ok(LoadOutcome::Loaded {
            entries,
            has_more: state.has_more,
        })
    }

    /// Re-fetch the current instance's contents from the top
    ///
    /// Requests offset 0 with a limit covering everything currently
    /// listed (at least one page) and replaces the instance's entries.
    /// Guarded and epoch-checked like [`Self::load_more`].
    pub async fn refresh(&self, payload: Value) -> Result<LoadOutcome<S::Entry>> {
        let instance_key = self.instance_key();
        let (epoch, limit) = {
            let mut states = self.states.write().unwrap();
            let state = states.entry(&instance_key);
            if state.status == LoadStatus::Loading {
                debug!(lineup = %instance_key, "refresh ignored, fetch already in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            state.status = LoadStatus::Loading;
            (state.epoch, state.len().max(self.config.page_size))
        };

        debug!(lineup = %instance_key, limit, "dispatching lineup refresh");
        let fetched = self.source.fetch_page(0, limit, &payload).await;

        let mut states = self.states.write().unwrap();
        let state = states.entry(&instance_key);
        if state.epoch != epoch {
            debug!(lineup = %instance_key, "discarding stale lineup refresh");
            return Ok(LoadOutcome::Stale);
        }

        let raw = match fetched {
            Ok(raw) => raw,
            Err(err) => {
                state.status = LoadStatus::Error;
                warn!(lineup = %instance_key, error = %err, "lineup refresh failed");
                return Err(FeedError::Fetch(err));
            }
        };

        let raw_len = raw.len();
        state.clear_entries();
        let entries = match &self.reconcile {
            Some(hook) => hook.reconcile(raw, state),
            None => raw,
        };
        let entries = self.merge_entries(state, &instance_key, entries)?;

        state.page = state.len().div_ceil(self.config.page_size) as u32;
        state.has_more = raw_len == limit;
        state.status = LoadStatus::Success;
        debug!(lineup = %instance_key, total = state.len(), "lineup refreshed");

        Ok(LoadOutcome::Loaded {
            entries,
            has_more: state.has_more,
        })
    }

    /// Return the current instance to its initial defaults
    ///
    /// Accumulated data clears; the coordinator's configuration
    /// survives. Any in-flight fetch for this instance is abandoned and
    /// its eventual resolution discarded.
    pub fn reset(&self) {
        let instance_key = self.instance_key();
        let mut states = self.states.write().unwrap();
        states.entry(&instance_key).reset_data();
        debug!(lineup = %instance_key, "lineup reset");
    }

    /// Replace the current instance's contents with entries fetched
    /// out of band (e.g. a search result list seeding a lineup)
    ///
    /// Runs the entries through the same UID-assignment and dedupe path
    /// as a fetched page, abandons any in-flight fetch, and advances the
    /// cursor past the injected entries so a following `load_more`
    /// requests the first uncovered offset.
    pub fn set_entries(
        &self,
        entries: Vec<S::Entry>,
        has_more: bool,
    ) -> Result<Vec<(Uid, S::Entry)>> {
        let instance_key = self.instance_key();
        let mut states = self.states.write().unwrap();
        let state = states.entry(&instance_key);

        state.reset_data();
        let kept = self.merge_entries(state, &instance_key, entries)?;
        state.page = state.len().div_ceil(self.config.page_size) as u32;
        state.has_more = has_more;
        state.status = LoadStatus::Success;
        debug!(lineup = %instance_key, total = state.len(), "lineup entries set");

        Ok(kept)
    }

    /// Remove one occurrence from its owning instance
    ///
    /// The UID's source names the instance it lives in.
    pub fn remove(&self, uid: &Uid) -> Result<()> {
        let mut states = self.states.write().unwrap();
        let removed = states
            .get_mut(uid.source())
            .is_some_and(|state| state.remove(uid));
        if removed {
            Ok(())
        } else {
            Err(FeedError::UnknownUid(uid.to_string()))
        }
    }

    /// Reorder the current instance's entries
    ///
    /// The new order must be a permutation of the present occurrences;
    /// membership, counts and cursor are untouched.
    pub fn update_order(&self, ordered: Vec<Uid>) -> Result<()> {
        let instance_key = self.instance_key();
        let mut states = self.states.write().unwrap();
        let Some(state) = states.get_mut(&instance_key) else {
            return if ordered.is_empty() {
                Ok(())
            } else {
                Err(FeedError::OrderMismatch)
            };
        };

        if ordered.len() != state.order.len() {
            return Err(FeedError::OrderMismatch);
        }
        let mut seen = HashSet::with_capacity(ordered.len());
        for uid in &ordered {
            let encoded = uid.to_string();
            if !state.entry_ids.contains(&encoded) || !seen.insert(encoded) {
                return Err(FeedError::OrderMismatch);
            }
        }

        state.order = ordered;
        Ok(())
    }

    /// Assign UIDs and append entries, honoring dedupe and pruning
    fn merge_entries(
        &self,
        state: &mut LineupState,
        instance_key: &str,
        entries: Vec<S::Entry>,
    ) -> Result<Vec<(Uid, S::Entry)>> {
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.config.remove_deleted && entry.is_deleted() {
                continue;
            }
            let key = entry.entry_key();
            if self.config.dedupe && state.contains_entry(&key) {
                continue;
            }
            let uid = Uid::new(key.kind, key.id, instance_key, state.next_count(&key))?;
            state.insert(uid.clone());
            kept.push((uid, entry));
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoadStatus;
    use crest_core::{EntityId, Kind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestTrack {
        id: EntityId,
        deleted: bool,
    }

    impl FeedEntry for TestTrack {
        fn kind(&self) -> Kind {
            Kind::Track
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn is_deleted(&self) -> bool {
            self.deleted
        }
    }

    fn track(id: EntityId) -> TestTrack {
        TestTrack { id, deleted: false }
    }

    /// Serves scripted pages indexed by `offset / limit`, recording
    /// every request. An optional gate suspends each fetch until
    /// released, for re-entrancy and staleness tests.
    #[derive(Clone)]
    struct ScriptedSource {
        pages: Arc<Vec<Vec<TestTrack>>>,
        calls: Arc<AtomicUsize>,
        requests: Arc<StdMutex<Vec<(usize, usize)>>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Vec<TestTrack>>) -> Self {
            Self {
                pages: Arc::new(pages),
                calls: Arc::new(AtomicUsize::new(0)),
                requests: Arc::new(StdMutex::new(Vec::new())),
                gate: None,
            }
        }

        fn gated(pages: Vec<Vec<TestTrack>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(pages)
            }
        }
    }

    #[async_trait::async_trait]
    impl LineupSource for ScriptedSource {
        type Entry = TestTrack;

        async fn fetch_page(
            &self,
            offset: usize,
            limit: usize,
            _payload: &Value,
        ) -> anyhow::Result<Vec<TestTrack>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((offset, limit));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.pages.get(offset / limit).cloned().unwrap_or_default())
        }
    }

    /// Fails on the first call, serves scripted pages afterwards.
    #[derive(Clone)]
    struct FlakySource {
        inner: ScriptedSource,
    }

    #[async_trait::async_trait]
    impl LineupSource for FlakySource {
        type Entry = TestTrack;

        async fn fetch_page(
            &self,
            offset: usize,
            limit: usize,
            payload: &Value,
        ) -> anyhow::Result<Vec<TestTrack>> {
            if self.inner.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("backend down");
            }
            self.inner
                .pages
                .get(offset / limit)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no page at offset {offset}"))
        }
    }

    fn order_ids(state: &LineupState) -> Vec<EntityId> {
        state.order.iter().map(Uid::id).collect()
    }

    fn order_counts(state: &LineupState) -> Vec<u32> {
        state.order.iter().map(Uid::count).collect()
    }

    #[tokio::test]
    async fn load_more_appends_pages_in_order() {
        let source = ScriptedSource::new(vec![
            vec![track(1), track(2), track(3)],
            vec![track(4), track(5)],
        ]);
        let lineup =
            Lineup::new(LineupConfig::new("TRENDING_WEEK", 3), source.clone()).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        lineup.load_more(Value::Null).await.unwrap();

        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 2, 3, 4, 5]);
        assert_eq!(state.entry_ids.len(), state.order.len());
        assert_eq!(state.page, 2);
        assert_eq!(state.status, LoadStatus::Success);
        // Second page was short, so the lineup is exhausted
        assert!(!state.has_more);
        assert_eq!(*source.requests.lock().unwrap(), vec![(0, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn dedupe_suppresses_cross_page_repeats() {
        let source = ScriptedSource::new(vec![
            vec![track(1), track(2), track(3)],
            vec![track(3), track(4), track(5)],
        ]);
        let config = LineupConfig::new("TRENDING_WEEK", 3).with_dedupe(true);
        let lineup = Lineup::new(config, source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        lineup.load_more(Value::Null).await.unwrap();

        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 2, 3, 4, 5]);
        assert_eq!(state.entry_ids.len(), 5);
        // The raw page was full, so pagination continues despite the drop
        assert!(state.has_more);
    }

    #[tokio::test]
    async fn repeats_count_occurrences_without_dedupe() {
        let source = ScriptedSource::new(vec![vec![track(1), track(1), track(2)]]);
        let lineup = Lineup::new(LineupConfig::new("PLAYLIST", 3), source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();

        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 1, 2]);
        assert_eq!(order_counts(&state), vec![0, 1, 0]);
        // Distinct counts keep the UID mirror free of duplicates
        assert_eq!(state.entry_ids.len(), 3);
    }

    #[tokio::test]
    async fn concurrent_load_more_triggers_one_fetch() {
        let gate = Arc::new(Notify::new());
        let source = ScriptedSource::gated(vec![vec![track(1), track(2)]], Arc::clone(&gate));
        let lineup = Lineup::new(LineupConfig::new("FEED", 2), source.clone()).unwrap();
        let second = lineup.clone();

        let (first_outcome, second_outcome) = tokio::join!(lineup.load_more(Value::Null), async {
            let outcome = second.load_more(Value::Null).await;
            gate.notify_one();
            outcome
        });

        assert!(matches!(
            second_outcome.unwrap(),
            LoadOutcome::AlreadyLoading
        ));
        assert!(matches!(first_outcome.unwrap(), LoadOutcome::Loaded { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(order_ids(&lineup.state()), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cursor_retryable() {
        let flaky = FlakySource {
            inner: ScriptedSource::new(vec![vec![track(1), track(2)]]),
        };
        let lineup = Lineup::new(LineupConfig::new("FEED", 2), flaky.clone()).unwrap();

        let err = lineup.load_more(Value::Null).await.unwrap_err();
        assert!(matches!(err, FeedError::Fetch(_)));

        let state = lineup.state();
        assert_eq!(state.status, LoadStatus::Error);
        assert_eq!(state.page, 0);
        assert!(state.is_empty());
        assert!(state.has_more);

        // Retry is indistinguishable from a fresh page request
        lineup.load_more(Value::Null).await.unwrap();
        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 2]);
        assert_eq!(state.page, 1);
        assert_eq!(state.status, LoadStatus::Success);
    }

    #[tokio::test]
    async fn instances_are_isolated_per_source_key() {
        let viewed_profile = Arc::new(StdMutex::new(7));
        let selector_profile = Arc::clone(&viewed_profile);

        let source = ScriptedSource::new(vec![vec![track(1), track(2)]]);
        let lineup = Lineup::new(LineupConfig::new("PROFILE_FEED", 2), source)
            .unwrap()
            .with_source_selector(move || {
                format!("PROFILE_FEED:{}", selector_profile.lock().unwrap())
            });

        lineup.load_more(Value::Null).await.unwrap();
        assert_eq!(lineup.state().page, 1);

        // Navigating to another profile starts from a fresh cursor
        *viewed_profile.lock().unwrap() = 9;
        let fresh = lineup.state();
        assert!(fresh.is_empty());
        assert_eq!(fresh.page, 0);

        lineup.load_more(Value::Null).await.unwrap();
        let seven = lineup.state_for("PROFILE_FEED:7");
        let nine = lineup.state_for("PROFILE_FEED:9");
        assert_eq!(order_ids(&seven), vec![1, 2]);
        assert_eq!(order_ids(&nine), vec![1, 2]);
        assert!(seven.order.iter().all(|uid| uid.belongs_to("PROFILE_FEED:7")));
        assert!(nine.order.iter().all(|uid| uid.belongs_to("PROFILE_FEED:9")));
    }

    #[tokio::test]
    async fn late_resolution_files_under_the_dispatching_instance() {
        let gate = Arc::new(Notify::new());
        let viewed_profile = Arc::new(StdMutex::new(7));
        let selector_profile = Arc::clone(&viewed_profile);

        let source =
            ScriptedSource::gated(vec![vec![track(1), track(2)]], Arc::clone(&gate));
        let lineup = Lineup::new(LineupConfig::new("PROFILE_FEED", 2), source)
            .unwrap()
            .with_source_selector(move || {
                format!("PROFILE_FEED:{}", selector_profile.lock().unwrap())
            });
        let navigator = Arc::clone(&viewed_profile);

        let (outcome, ()) = tokio::join!(lineup.load_more(Value::Null), async {
            // Navigate away while the fetch is still in flight
            *navigator.lock().unwrap() = 9;
            gate.notify_one();
        });

        assert!(matches!(outcome.unwrap(), LoadOutcome::Loaded { .. }));
        assert_eq!(order_ids(&lineup.state_for("PROFILE_FEED:7")), vec![1, 2]);
        assert!(lineup.state_for("PROFILE_FEED:9").is_empty());
    }

    #[tokio::test]
    async fn reset_restores_defaults_and_preserves_config() {
        let source = ScriptedSource::new(vec![vec![track(1), track(2)]]);
        let lineup = Lineup::new(LineupConfig::new("SAVED_TRACKS", 2), source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        lineup.reset();

        let state = lineup.state();
        assert!(state.is_empty());
        assert!(state.entry_ids.is_empty());
        assert_eq!(state.page, 0);
        assert!(state.has_more);
        assert_eq!(state.status, LoadStatus::Idle);
        assert_eq!(lineup.prefix(), "SAVED_TRACKS");
        assert_eq!(lineup.page_size(), 2);
    }

    #[tokio::test]
    async fn stale_fetch_is_discarded_after_reset() {
        let gate = Arc::new(Notify::new());
        let source = ScriptedSource::gated(vec![vec![track(1), track(2)]], Arc::clone(&gate));
        let lineup = Lineup::new(LineupConfig::new("FEED", 2), source).unwrap();
        let resetter = lineup.clone();

        let (outcome, ()) = tokio::join!(lineup.load_more(Value::Null), async {
            resetter.reset();
            gate.notify_one();
        });

        assert!(matches!(outcome.unwrap(), LoadOutcome::Stale));
        let state = lineup.state();
        assert!(state.is_empty());
        assert_eq!(state.page, 0);
        assert_eq!(state.status, LoadStatus::Idle);
    }

    #[tokio::test]
    async fn reconcile_appends_optimistic_entry_exactly_once() {
        let source = ScriptedSource::new(vec![
            vec![track(1), track(2)],
            vec![track(99), track(3)],
        ]);
        let config = LineupConfig::new("PROFILE_REPOSTS", 2).with_dedupe(true);
        let lineup = Lineup::new(config, source).unwrap().with_reconcile(
            |mut server: Vec<TestTrack>, state: &LineupState| {
                // The user just reposted track 99; surface it before the
                // backend has indexed it, but never twice.
                let key = EntryKey::new(Kind::Track, 99);
                let already_fetched = server.iter().any(|e| e.entry_key() == key);
                if !already_fetched && !state.contains_entry(&key) {
                    server.push(track(99));
                }
                server
            },
        );

        lineup.load_more(Value::Null).await.unwrap();
        assert_eq!(order_ids(&lineup.state()), vec![1, 2, 99]);

        // The server catches up and returns 99 itself; dedupe holds
        lineup.load_more(Value::Null).await.unwrap();
        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 2, 99, 3]);
        assert_eq!(state.entry_ids.len(), 4);
    }

    #[tokio::test]
    async fn deleted_entries_are_pruned() {
        let deleted = TestTrack {
            id: 2,
            deleted: true,
        };
        let source = ScriptedSource::new(vec![vec![track(1), deleted, track(3)]]);
        let lineup = Lineup::new(LineupConfig::new("FEED", 3), source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();

        let state = lineup.state();
        assert_eq!(order_ids(&state), vec![1, 3]);
        // has_more keys off the raw page size, not the pruned one
        assert!(state.has_more);
    }

    #[tokio::test]
    async fn set_entries_seeds_subsequent_pagination() {
        let source = ScriptedSource::new(vec![Vec::new(); 8]);
        let lineup = Lineup::new(LineupConfig::new("SEARCH_TRACKS", 2), source.clone()).unwrap();

        let seeded = lineup
            .set_entries(vec![track(1), track(2), track(3), track(4), track(5)], true)
            .unwrap();
        assert_eq!(seeded.len(), 5);

        let state = lineup.state();
        assert_eq!(state.page, 3);
        assert_eq!(state.status, LoadStatus::Success);
        assert!(state.has_more);

        // The next page starts past the injected entries
        lineup.load_more(Value::Null).await.unwrap();
        assert_eq!(*source.requests.lock().unwrap(), vec![(6, 2)]);
    }

    #[tokio::test]
    async fn refresh_replaces_contents_covering_current_length() {
        let source =
            ScriptedSource::new(vec![vec![track(1), track(2)], vec![track(3), track(4)]]);
        let lineup = Lineup::new(LineupConfig::new("FEED", 2), source.clone()).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        lineup.load_more(Value::Null).await.unwrap();
        assert_eq!(lineup.state().len(), 4);

        let outcome = lineup.refresh(Value::Null).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded { .. }));

        let state = lineup.state();
        // Offset 0, limit covering the four listed entries
        assert_eq!(source.requests.lock().unwrap().last(), Some(&(0, 4)));
        assert_eq!(order_ids(&state), vec![1, 2]);
        assert_eq!(state.page, 1);
        assert!(!state.has_more);
    }

    #[tokio::test]
    async fn remove_and_update_order() {
        let source = ScriptedSource::new(vec![vec![track(1), track(2), track(3)]]);
        let lineup = Lineup::new(LineupConfig::new("QUEUEABLE", 3), source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        let order = lineup.state().order;

        lineup.remove(&order[1]).unwrap();
        assert_eq!(order_ids(&lineup.state()), vec![1, 3]);

        // Removing the same occurrence twice fails
        let err = lineup.remove(&order[1]).unwrap_err();
        assert!(matches!(err, FeedError::UnknownUid(_)));

        let reversed: Vec<Uid> = lineup.state().order.into_iter().rev().collect();
        lineup.update_order(reversed).unwrap();
        assert_eq!(order_ids(&lineup.state()), vec![3, 1]);

        // A foreign uid is not a permutation of the current entries
        let foreign = Uid::new(Kind::Track, 42, "QUEUEABLE", 0).unwrap();
        let err = lineup
            .update_order(vec![foreign.clone(), foreign])
            .unwrap_err();
        assert!(matches!(err, FeedError::OrderMismatch));
    }

    #[tokio::test]
    async fn no_duplicate_uids_across_mixed_operations() {
        let source = ScriptedSource::new(vec![
            vec![track(1), track(1), track(2)],
            vec![track(2), track(1), track(3)],
        ]);
        let lineup = Lineup::new(LineupConfig::new("HISTORY", 3), source).unwrap();

        lineup.load_more(Value::Null).await.unwrap();
        lineup.load_more(Value::Null).await.unwrap();

        let state = lineup.state();
        assert_eq!(state.entry_ids.len(), state.order.len());
        let distinct: HashSet<String> =
            state.order.iter().map(ToString::to_string).collect();
        assert_eq!(distinct.len(), state.order.len());
    }
}

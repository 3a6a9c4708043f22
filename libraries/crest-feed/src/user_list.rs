//! User-list coordinator
//!
//! The flat sibling of the lineup coordinator: paginated lists of user
//! ids (followers, following, reposters, favoriters) keyed by a
//! registered tag. No UID codec is involved since a user appears at most
//! once per list, server-deduplicated. Fetch failures route to an error
//! dispatcher supplied at construction, in addition to being returned.

use crate::error::{FeedError, Result};
use crate::source::UserListSource;
use crate::store::StateStore;
use crate::types::{LoadStatus, UserListState};
use crest_core::EntityId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

type ErrorDispatch = dyn Fn(&str, &FeedError) + Send + Sync;
type SourceMap = HashMap<String, Arc<dyn UserListSource>>;

/// Result of a [`UserList::load_more`] call
#[derive(Debug)]
pub enum UserLoadOutcome {
    /// The fetched page was appended
    Loaded {
        /// Ids appended by this page
        user_ids: Vec<EntityId>,
        /// Whether the server reports another page
        has_more: bool,
    },

    /// A fetch was already in flight for this tag; nothing was done
    AlreadyLoading,

    /// The tag was reset or replaced while the fetch was in flight;
    /// the result was discarded
    Stale,
}

/// Coordinator for tagged, paginated user-id lists
#[derive(Clone)]
pub struct UserList {
    sources: Arc<RwLock<SourceMap>>,
    states: Arc<RwLock<StateStore<UserListState>>>,
    on_error: Arc<ErrorDispatch>,
}

impl UserList {
    /// Create a coordinator with an error dispatcher
    ///
    /// The dispatcher observes every fetch failure alongside the `Err`
    /// return, so a UI-facing channel sees them without every call site
    /// wiring its own handling.
    pub fn new(on_error: impl Fn(&str, &FeedError) + Send + Sync + 'static) -> Self {
        Self {
            sources: Arc::new(RwLock::new(HashMap::new())),
            states: Arc::new(RwLock::new(StateStore::new())),
            on_error: Arc::new(on_error),
        }
    }

    /// Register a list under a tag
    ///
    /// The tag names the list for every later operation. An empty tag or
    /// zero page size is a configuration error, as is registering the
    /// same tag twice.
    pub fn register(
        &self,
        tag: impl Into<String>,
        page_size: usize,
        source: impl UserListSource + 'static,
    ) -> Result<()> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(FeedError::InvalidConfig("tag must not be empty".into()));
        }
        if page_size == 0 {
            return Err(FeedError::InvalidConfig("page_size must be positive".into()));
        }

        let mut sources = self.sources.write().unwrap();
        if sources.contains_key(&tag) {
            return Err(FeedError::DuplicateTag(tag));
        }
        self.states.write().unwrap().entry(&tag).page_size = page_size;
        debug!(user_list = %tag, page_size, "user list registered");
        sources.insert(tag, Arc::new(source));
        Ok(())
    }

    /// Tags registered so far
    pub fn tags(&self) -> Vec<String> {
        self.sources.read().unwrap().keys().cloned().collect()
    }

    /// Snapshot of a tag's state
    ///
    /// Unregistered tags report the defaults.
    pub fn state(&self, tag: &str) -> UserListState {
        self.states.read().unwrap().snapshot(tag)
    }

    /// Fetch and append the next page for a tag
    ///
    /// Guarded and epoch-checked like the lineup coordinator: one fetch
    /// in flight per tag, failures leave the cursor untouched, stale
    /// resolutions are discarded. Returned ids are appended verbatim;
    /// the server is trusted to deduplicate.
    pub async fn load_more(&self, tag: &str) -> Result<UserLoadOutcome> {
        let source = self.source_for(tag)?;
        let (page, page_size, epoch) = {
            let mut states = self.states.write().unwrap();
            let state = states.entry(tag);
            if state.status == LoadStatus::Loading {
                debug!(user_list = %tag, "load_more ignored, fetch already in flight");
                return Ok(UserLoadOutcome::AlreadyLoading);
            }
            state.status = LoadStatus::Loading;
            (state.page, state.page_size, state.epoch)
        };

        debug!(user_list = %tag, page, page_size, "dispatching user list fetch");
        let fetched = source.fetch_users(page, page_size).await;

        let mut states = self.states.write().unwrap();
        let state = states.entry(tag);
        if state.epoch != epoch {
            debug!(user_list = %tag, "discarding stale user list fetch");
            return Ok(UserLoadOutcome::Stale);
        }

        match fetched {
            Err(err) => {
                state.status = LoadStatus::Error;
                drop(states);
                let err = FeedError::Fetch(err);
                warn!(user_list = %tag, error = %err, "user list fetch failed");
                (self.on_error)(tag, &err);
                Err(err)
            }
            Ok(fetched_page) => {
                state.user_ids.extend_from_slice(&fetched_page.user_ids);
                state.page += 1;
                state.has_more = fetched_page.has_more;
                state.status = LoadStatus::Success;
                debug!(
                    user_list = %tag,
                    appended = fetched_page.user_ids.len(),
                    total = state.user_ids.len(),
                    has_more = state.has_more,
                    "user list fetch merged"
                );
                Ok(UserLoadOutcome::Loaded {
                    user_ids: fetched_page.user_ids,
                    has_more: fetched_page.has_more,
                })
            }
        }
    }

    /// Return a tag to its initial defaults
    ///
    /// The registered page size survives; any in-flight fetch for the
    /// tag is abandoned.
    pub fn reset(&self, tag: &str) -> Result<()> {
        self.source_for(tag)?;
        self.states.write().unwrap().entry(tag).reset_data();
        debug!(user_list = %tag, "user list reset");
        Ok(())
    }

    /// Replace a tag's contents with ids obtained out of band
    ///
    /// Abandons any in-flight fetch and advances the cursor past the
    /// injected ids so a following `load_more` requests the first
    /// uncovered page.
    pub fn set_users(&self, tag: &str, user_ids: Vec<EntityId>, has_more: bool) -> Result<()> {
        self.source_for(tag)?;
        let mut states = self.states.write().unwrap();
        let state = states.entry(tag);

        state.reset_data();
        state.page = user_ids.len().div_ceil(state.page_size) as u32;
        state.user_ids = user_ids;
        state.has_more = has_more;
        state.status = LoadStatus::Success;
        debug!(user_list = %tag, total = state.user_ids.len(), "user list entries set");
        Ok(())
    }

    fn source_for(&self, tag: &str) -> Result<Arc<dyn UserListSource>> {
        self.sources
            .read()
            .unwrap()
            .get(tag)
            .cloned()
            .ok_or_else(|| FeedError::UnknownTag(tag.to_string()))
    }
}

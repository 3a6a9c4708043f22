//! Collaborator seams for the feed coordinators
//!
//! The remote API client is an external collaborator; the coordinators
//! only require these traits. Fetch implementations must fail by
//! returning an error, never a sentinel value, and should be idempotent
//! for a given cursor so a retry after failure is safe.

use crate::types::{LineupState, UserPage};
use async_trait::async_trait;
use crest_core::FeedEntry;
use serde_json::Value;

/// Pages of mixed-kind content for a lineup
///
/// `offset`/`limit` come from the owning instance's cursor; `payload`
/// is an opaque request argument threaded through from the caller
/// (e.g. a trending time range).
#[async_trait]
pub trait LineupSource: Send + Sync {
    /// The entity type this source produces
    type Entry: FeedEntry + Send + Sync;

    /// Fetch one page of entities
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        payload: &Value,
    ) -> anyhow::Result<Vec<Self::Entry>>;
}

/// Pages of user ids for a user list
#[async_trait]
pub trait UserListSource: Send + Sync {
    /// Fetch one page of user ids
    async fn fetch_users(&self, page: u32, page_size: usize) -> anyhow::Result<UserPage>;
}

/// Optimistic-merge hook
///
/// Runs synchronously on each successful fetch, before UID assignment,
/// with the raw server entities and the owning instance's current
/// state. The typical implementation appends a locally-known entity the
/// user just acted on (a fresh repost the backend has not indexed yet)
/// when it is absent from both the server results and the instance.
/// Must be pure: no side effects, no awaits.
pub trait Reconcile<E>: Send + Sync {
    /// Merge locally-known entities into a fetched page
    fn reconcile(&self, server: Vec<E>, state: &LineupState) -> Vec<E>;
}

impl<E, F> Reconcile<E> for F
where
    F: Fn(Vec<E>, &LineupState) -> Vec<E> + Send + Sync,
{
    fn reconcile(&self, server: Vec<E>, state: &LineupState) -> Vec<E> {
        self(server, state)
    }
}

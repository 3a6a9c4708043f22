//! Crest - Feed Pagination Engine
//!
//! Coordinated pagination, deduplication and ordering for the content
//! lists of a media client.
//!
//! This crate provides:
//! - Lineup coordinator (paginated mixed-kind lists with occurrence UIDs)
//! - User-list coordinator (flat paginated user-id lists keyed by tag)
//! - Keyed list-state store (isolated cursors per instance)
//! - Lineup registry (type-erased cross-cutting control)
//! - Optimistic-merge and deleted-entry-pruning hooks
//!
//! # Architecture
//!
//! `crest-feed` owns cursors and occurrence identity, nothing else:
//! - No HTTP client; fetching is delegated through the [`LineupSource`]
//!   and [`UserListSource`] traits
//! - No entity storage; fetched payloads go to the caller's entity
//!   cache, keyed by the [`crest_core::EntryKey`]s the engine reports
//! - No rendering; views consume cloned state snapshots
//!
//! Every feed surface (trending, profile feeds, search results, saved
//! tracks) shares identical cursor and anti-duplicate behavior; only the
//! source and the optional hooks vary.
//!
//! # Example: Paginating a feed
//!
//! ```rust
//! use async_trait::async_trait;
//! use crest_core::{EntityId, FeedEntry, Kind};
//! use crest_feed::{Lineup, LineupConfig, LineupSource, LoadOutcome};
//! use serde_json::Value;
//!
//! struct Track {
//!     id: EntityId,
//! }
//!
//! impl FeedEntry for Track {
//!     fn kind(&self) -> Kind {
//!         Kind::Track
//!     }
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//! }
//!
//! struct TrendingSource;
//!
//! #[async_trait]
//! impl LineupSource for TrendingSource {
//!     type Entry = Track;
//!
//!     async fn fetch_page(
//!         &self,
//!         offset: usize,
//!         limit: usize,
//!         _payload: &Value,
//!     ) -> anyhow::Result<Vec<Track>> {
//!         // A real source calls the remote API client here
//!         Ok((offset..offset + limit)
//!             .map(|id| Track { id: id as EntityId })
//!             .collect())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> crest_feed::Result<()> {
//! let lineup = Lineup::new(LineupConfig::new("TRENDING_WEEK", 10), TrendingSource)?;
//!
//! if let LoadOutcome::Loaded { entries, has_more } = lineup.load_more(Value::Null).await? {
//!     // Write `entries` payloads to the entity cache, render `order`
//!     assert_eq!(entries.len(), 10);
//!     assert!(has_more);
//! }
//! assert_eq!(lineup.state().page, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Per-context instances
//!
//! A single coordinator serves every profile page; the source selector
//! picks the instance key, and each key owns an independent cursor:
//!
//! ```rust,no_run
//! # use async_trait::async_trait;
//! # use crest_core::{EntityId, FeedEntry, Kind};
//! # use crest_feed::{Lineup, LineupConfig, LineupSource};
//! # use serde_json::Value;
//! # struct Track { id: EntityId }
//! # impl FeedEntry for Track {
//! #     fn kind(&self) -> Kind { Kind::Track }
//! #     fn id(&self) -> EntityId { self.id }
//! # }
//! # struct ProfileSource;
//! # #[async_trait]
//! # impl LineupSource for ProfileSource {
//! #     type Entry = Track;
//! #     async fn fetch_page(&self, _: usize, _: usize, _: &Value) -> anyhow::Result<Vec<Track>> {
//! #         Ok(Vec::new())
//! #     }
//! # }
//! # fn currently_viewed_profile() -> EntityId { 7 }
//! # fn main() -> crest_feed::Result<()> {
//! let lineup = Lineup::new(LineupConfig::new("PROFILE_FEED", 25), ProfileSource)?
//!     .with_source_selector(|| format!("PROFILE_FEED:{}", currently_viewed_profile()));
//! # Ok(())
//! # }
//! ```

mod error;
mod lineup;
mod registry;
mod source;
mod store;
pub mod types;
mod user_list;

// Public exports
pub use error::{FeedError, Result};
pub use lineup::{Lineup, LoadOutcome};
pub use registry::{LineupControl, LineupRegistry};
pub use source::{LineupSource, Reconcile, UserListSource};
pub use types::{LineupConfig, LineupState, LoadStatus, UserListState, UserPage};
pub use user_list::{UserList, UserLoadOutcome};

//! Crest Core
//!
//! Platform-agnostic core types for the Crest client.
//!
//! This crate provides the foundational building blocks shared by every
//! content surface in the client:
//! - **Domain Types**: entity [`Kind`]s, numeric [`EntityId`]s, and the
//!   cache identity [`EntryKey`]
//! - **Core Traits**: [`FeedEntry`], the minimal surface the feed engine
//!   requires of a fetched entity
//! - **Identifier Codec**: [`Uid`], the parseable composite identifier
//!   naming one occurrence of an entity inside one list instance
//!
//! The entity cache itself lives elsewhere; this crate only defines how
//! entries are identified, never how their payloads are stored.
//!
//! # Example
//!
//! ```rust
//! use crest_core::{EntryKey, Kind, Uid};
//!
//! let uid = Uid::new(Kind::Track, 42, "TRENDING_WEEK", 0).unwrap();
//! assert_eq!(uid.to_string(), "track:42:TRENDING_WEEK:0");
//!
//! let parsed: Uid = "track:42:TRENDING_WEEK:0".parse().unwrap();
//! assert_eq!(parsed, uid);
//! assert_eq!(parsed.entry_key(), EntryKey::new(Kind::Track, 42));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;
pub mod uid;

// Re-export commonly used types
pub use error::{Result, UidError};
pub use traits::FeedEntry;
pub use types::{EntityId, EntryKey, Kind};
pub use uid::{Uid, UID_DELIMITER};

//! Error types for the feed coordinators

use crest_core::UidError;
use thiserror::Error;

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors produced by the feed coordinators
///
/// Fetch failures are the only recoverable variant: the owning instance
/// is left in `Error` status with its cursor untouched, so the caller's
/// retry is indistinguishable from a fresh page request. Everything else
/// is a programmer error raised eagerly.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The injected fetch function failed
    #[error("fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),

    /// Coordinator configuration is unusable (empty prefix, zero page size)
    #[error("invalid coordinator configuration: {0}")]
    InvalidConfig(String),

    /// No user list is registered under this tag
    #[error("no user list registered for tag {0:?}")]
    UnknownTag(String),

    /// A user list is already registered under this tag
    #[error("user list tag {0:?} already registered")]
    DuplicateTag(String),

    /// A lineup is already registered under this prefix
    #[error("lineup prefix {0:?} already registered")]
    DuplicatePrefix(String),

    /// The UID does not name an occurrence present in its instance
    #[error("uid {0} is not present in its lineup")]
    UnknownUid(String),

    /// A reordering did not permute the current entries
    #[error("new order must be a permutation of the current entries")]
    OrderMismatch,

    /// Identifier codec failure
    #[error(transparent)]
    Uid(#[from] UidError),
}

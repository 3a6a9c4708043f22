//! Error types for the identifier codec

use thiserror::Error;

/// Result type alias using [`UidError`]
pub type Result<T> = std::result::Result<T, UidError>;

/// Errors produced by the identifier codec
///
/// These are raised at the call site and never silently coerced; a UID
/// that fails to encode or decode is a programming error in the caller,
/// not a recoverable runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UidError {
    /// A free-form component would make the encoded string unparseable
    #[error("invalid uid {component} component: {value:?}")]
    InvalidComponent {
        /// Which component was rejected (e.g. `"source"`)
        component: &'static str,
        /// The offending value
        value: String,
    },

    /// A string could not be decoded into a UID
    #[error("malformed uid {uid:?}: {reason}")]
    Malformed {
        /// The string that failed to parse
        uid: String,
        /// Why it failed
        reason: &'static str,
    },
}

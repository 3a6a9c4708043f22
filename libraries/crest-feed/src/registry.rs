//! Lineup registry
//!
//! Cross-cutting operations (sign-out wiping every feed, a debug panel
//! listing cursors) need to reach lineups of heterogeneous entry types.
//! [`LineupControl`] is the type-erased surface every [`Lineup`]
//! exposes; the registry maps each coordinator's prefix to it.

use crate::error::{FeedError, Result};
use crate::lineup::Lineup;
use crate::source::LineupSource;
use crate::types::LineupState;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

type ControlMap = HashMap<String, Arc<dyn LineupControl>>;

/// Entry-type-independent surface of a lineup coordinator
pub trait LineupControl: Send + Sync {
    /// Static prefix of the coordinator
    fn prefix(&self) -> &str;

    /// Snapshot of the current instance's state
    fn state(&self) -> LineupState;

    /// Snapshot of an arbitrary instance's state
    fn state_for(&self, instance_key: &str) -> LineupState;

    /// Return the current instance to its initial defaults
    fn reset(&self);
}

impl<S: LineupSource> LineupControl for Lineup<S> {
    fn prefix(&self) -> &str {
        Lineup::prefix(self)
    }

    fn state(&self) -> LineupState {
        Lineup::state(self)
    }

    fn state_for(&self, instance_key: &str) -> LineupState {
        Lineup::state_for(self, instance_key)
    }

    fn reset(&self) {
        Lineup::reset(self);
    }
}

/// Prefix-keyed directory of lineup coordinators
#[derive(Clone, Default)]
pub struct LineupRegistry {
    lineups: Arc<RwLock<ControlMap>>,
}

impl LineupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a coordinator under its prefix
    ///
    /// Two coordinators sharing a prefix would silently share instance
    /// keys, so a duplicate registration is a configuration error.
    pub fn register(&self, lineup: Arc<dyn LineupControl>) -> Result<()> {
        let prefix = lineup.prefix().to_string();
        let mut lineups = self.lineups.write().unwrap();
        if lineups.contains_key(&prefix) {
            return Err(FeedError::DuplicatePrefix(prefix));
        }
        debug!(prefix = %prefix, "lineup registered");
        lineups.insert(prefix, lineup);
        Ok(())
    }

    /// Look up a coordinator by prefix
    pub fn get(&self, prefix: &str) -> Option<Arc<dyn LineupControl>> {
        self.lineups.read().unwrap().get(prefix).cloned()
    }

    /// Prefixes registered so far
    pub fn prefixes(&self) -> Vec<String> {
        self.lineups.read().unwrap().keys().cloned().collect()
    }

    /// Reset the current instance of every registered coordinator
    pub fn reset_all(&self) {
        let lineups: Vec<Arc<dyn LineupControl>> =
            self.lineups.read().unwrap().values().cloned().collect();
        for lineup in lineups {
            lineup.reset();
        }
    }

    /// Number of registered coordinators
    pub fn len(&self) -> usize {
        self.lineups.read().unwrap().len()
    }

    /// Whether no coordinator is registered
    pub fn is_empty(&self) -> bool {
        self.lineups.read().unwrap().is_empty()
    }
}

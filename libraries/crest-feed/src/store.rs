//! Keyed list-instance state
//!
//! One map from instance key to pagination state, shared in shape by
//! both coordinators: lineups key their instances by `prefix` or
//! `prefix:context`, user lists by `tag`. Instances are created lazily
//! with defaults on first touch and live until the surrounding store is
//! dropped; only an explicit reset returns one to its defaults.

use std::collections::HashMap;

/// Map from instance key to per-instance state
///
/// Mutation goes exclusively through the owning coordinator; nothing
/// else holds a reference to the inner states.
#[derive(Debug)]
pub struct StateStore<S> {
    states: HashMap<String, S>,
}

impl<S: Default> StateStore<S> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Look up an instance without creating it
    pub fn get(&self, key: &str) -> Option<&S> {
        self.states.get(key)
    }

    /// Look up an instance mutably without creating it
    pub fn get_mut(&mut self, key: &str) -> Option<&mut S> {
        self.states.get_mut(key)
    }

    /// Look up an instance, creating it with defaults on first touch
    pub fn entry(&mut self, key: &str) -> &mut S {
        self.states.entry(key.to_string()).or_default()
    }

    /// Clone of an instance's state, or the defaults if never touched
    pub fn snapshot(&self, key: &str) -> S
    where
        S: Clone,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Keys of all instances created so far
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Number of instances created so far
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no instance has been created yet
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<S: Default> Default for StateStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

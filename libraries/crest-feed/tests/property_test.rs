//! Property-based tests for lineup state invariants.
//!
//! Exercises the synchronous mutation surface (`set_entries`, `remove`,
//! `update_order`) with randomized entity scripts and checks that the
//! order/mirror/count bookkeeping never drifts.

use async_trait::async_trait;
use crest_core::{EntityId, EntryKey, FeedEntry, Kind};
use crest_feed::{Lineup, LineupConfig, LineupSource};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct Item(EntityId);

impl FeedEntry for Item {
    fn kind(&self) -> Kind {
        Kind::Track
    }

    fn id(&self) -> EntityId {
        self.0
    }
}

/// Never fetched; these tests drive the lineup synchronously.
struct NullSource;

#[async_trait]
impl LineupSource for NullSource {
    type Entry = Item;

    async fn fetch_page(
        &self,
        _offset: usize,
        _limit: usize,
        _payload: &Value,
    ) -> anyhow::Result<Vec<Item>> {
        Ok(Vec::new())
    }
}

fn lineup(page_size: usize, dedupe: bool) -> Lineup<NullSource> {
    let config = LineupConfig::new("PROP", page_size).with_dedupe(dedupe);
    Lineup::new(config, NullSource).unwrap()
}

proptest! {
    #[test]
    fn mirrors_stay_consistent_after_set_entries(
        ids in prop::collection::vec(1..20i64, 0..40),
        page_size in 1..10usize,
        dedupe in any::<bool>(),
    ) {
        let lineup = lineup(page_size, dedupe);
        let assigned = lineup
            .set_entries(ids.iter().copied().map(Item).collect(), true)
            .unwrap();

        let state = lineup.state();
        prop_assert_eq!(assigned.len(), state.order.len());
        prop_assert_eq!(state.entry_ids.len(), state.order.len());
        prop_assert_eq!(state.page as usize, state.len().div_ceil(page_size));

        // Every listed occurrence carries a distinct identifier
        let distinct: HashSet<String> =
            state.order.iter().map(ToString::to_string).collect();
        prop_assert_eq!(distinct.len(), state.order.len());

        // The count index agrees with the listed occurrences
        let mut observed: HashMap<EntryKey, u32> = HashMap::new();
        for uid in &state.order {
            *observed.entry(uid.entry_key()).or_insert(0) += 1;
        }
        prop_assert_eq!(&observed, &state.entry_counts);

        if dedupe {
            prop_assert!(observed.values().all(|&count| count == 1));
        }
    }

    #[test]
    fn removal_keeps_mirrors_consistent(
        ids in prop::collection::vec(1..10i64, 1..30),
        page_size in 1..10usize,
        removals in 0..30usize,
    ) {
        let lineup = lineup(page_size, false);
        lineup
            .set_entries(ids.iter().copied().map(Item).collect(), false)
            .unwrap();

        let order = lineup.state().order;
        for uid in order.iter().take(removals.min(order.len())) {
            lineup.remove(uid).unwrap();
        }

        let state = lineup.state();
        prop_assert_eq!(state.len(), order.len() - removals.min(order.len()));
        prop_assert_eq!(state.entry_ids.len(), state.order.len());

        let mut observed: HashMap<EntryKey, u32> = HashMap::new();
        for uid in &state.order {
            *observed.entry(uid.entry_key()).or_insert(0) += 1;
        }
        prop_assert_eq!(&observed, &state.entry_counts);
    }

    #[test]
    fn reordering_preserves_membership(
        ids in prop::collection::vec(1..10i64, 0..20),
        page_size in 1..10usize,
    ) {
        let lineup = lineup(page_size, false);
        lineup
            .set_entries(ids.iter().copied().map(Item).collect(), false)
            .unwrap();

        let mut reversed = lineup.state().order;
        reversed.reverse();
        lineup.update_order(reversed.clone()).unwrap();

        let state = lineup.state();
        prop_assert_eq!(state.order, reversed);
        prop_assert_eq!(state.entry_ids.len(), ids.len());
    }
}

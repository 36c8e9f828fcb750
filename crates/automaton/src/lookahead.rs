// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Resolution of effective lookahead (spec §4.E "finalization"): every
//! item's generated set plus everything reachable through its sources,
//! collapsed once into a literal [`TerminalSet`] so table construction
//! never has to walk sources again.

use std::collections::{BTreeSet, HashMap};

use symbols::TerminalSet;

use crate::item::LookaheadSource;
use crate::state::State;

pub fn finalize(states: &mut [State], terminal_capacity: u32) {
    let mut memo: HashMap<(u32, u32), TerminalSet> = HashMap::new();
    let snapshot: Vec<State> = states.to_vec();
    for state in states.iter_mut() {
        for (_, data) in state.items.iter_mut() {
            let resolved = resolve_data(
                &snapshot,
                &data.generated,
                &data.sources,
                &mut memo,
                terminal_capacity,
            );
            data.generated = resolved;
            data.sources.clear();
        }
    }
}

/// Resolves the effective lookahead of a `generated`/`sources` pair that
/// isn't (yet) stored in `states` itself — used by LSCELR's conflict
/// detection and masked re-merge test, which both need to ask "what would
/// this item's lookahead resolve to" before the item has been committed
/// to the automaton.
pub(crate) fn effective_lookahead(
    states: &[State],
    generated: &TerminalSet,
    sources: &BTreeSet<LookaheadSource>,
    capacity: u32,
) -> TerminalSet {
    let mut memo: HashMap<(u32, u32), TerminalSet> = HashMap::new();
    resolve_data(states, generated, sources, &mut memo, capacity)
}

fn resolve_data(
    states: &[State],
    generated: &TerminalSet,
    sources: &BTreeSet<LookaheadSource>,
    memo: &mut HashMap<(u32, u32), TerminalSet>,
    capacity: u32,
) -> TerminalSet {
    let mut result = generated.clone();
    for source in sources.iter().copied() {
        result.union_with(&resolve_item(states, source.state, source.item, memo, capacity));
    }
    result
}

fn resolve_item(
    states: &[State],
    state_id: u32,
    item_idx: u32,
    memo: &mut HashMap<(u32, u32), TerminalSet>,
    capacity: u32,
) -> TerminalSet {
    if let Some(cached) = memo.get(&(state_id, item_idx)) {
        return cached.clone();
    }
    // Seed with empty before recursing so a cycle through sources
    // contributes nothing extra rather than looping forever.
    memo.insert((state_id, item_idx), TerminalSet::new(capacity));

    let (_, data) = &states[state_id as usize].items[item_idx as usize];
    let result = resolve_data(states, &data.generated, &data.sources, memo, capacity);
    memo.insert((state_id, item_idx), result.clone());
    result
}

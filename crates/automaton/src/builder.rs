// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Shared state-expansion scaffolding for the relational builders (LALR,
//! canonical LR(1), LSCELR): one isocore table, one DFS expander, and a
//! pluggable [`MergePolicy`] that decides, each time a transition lands on
//! an existing kernel, whether the candidate folds into one of its
//! isocores or stands apart as a new one (spec §4.F).
//!
//! A kernel's *closed item keys* are a function of the grammar alone (the
//! LR(0) shape), never of the lookaheads attached to them, so a state's
//! outgoing transitions only ever need to be computed once, the first
//! time that kernel is seen — merging lookaheads into an existing isocore
//! later never requires revisiting its successors.

use std::collections::{BTreeMap, VecDeque};

use grammar::Grammar;
use predict::PredictiveSets;
use symbols::{Symbol, TerminalSet};

use crate::closure::lr1_closure;
use crate::item::{kernel_keys, ItemKey, KernelItem, KernelKeys, LookaheadSource, Lr1ItemData};
use crate::state::State;

/// The `(predecessor state, symbol)` edges that fed a given target state
/// during [`build_relational`]: exactly one when the target was reached by
/// a single transition, more than one whenever two distinct predecessors'
/// successor kernels shared the same [`KernelKeys`] and were folded
/// together by the merge policy. LSCELR's split pass (`lscelr.rs`) is the
/// only consumer that cares about the "more than one" case.
pub type Lanes = BTreeMap<u32, Vec<(u32, Symbol)>>;

pub enum MergeDecision {
    MergeInto(u32),
    CreateNew,
}

pub trait MergePolicy {
    fn reconcile(
        &self,
        states: &[State],
        isocore_ids: &[u32],
        candidate: &BTreeMap<ItemKey, Lr1ItemData>,
    ) -> MergeDecision;
}

/// Builds the relational automaton for `grammar` under `policy`, starting
/// from the single kernel item `S' -> . S $` with `{$}` as its only
/// lookahead. Alongside the states, returns the [`Lanes`] map recording
/// which predecessor edges fed each state, for LSCELR's split pass to
/// consult.
pub fn build_relational(
    grammar: &Grammar,
    predict: &PredictiveSets,
    policy: &dyn MergePolicy,
) -> (Vec<State>, Lanes) {
    let cap = predict.terminal_capacity();
    let mut states: Vec<State> = Vec::new();
    let mut isocores: BTreeMap<KernelKeys, Vec<u32>> = BTreeMap::new();
    let mut worklist: VecDeque<u32> = VecDeque::new();
    let mut lanes: Lanes = BTreeMap::new();

    let mut eof_set = TerminalSet::new(cap);
    eof_set.insert(Symbol::Eof);
    let seed = vec![KernelItem {
        key: ItemKey::initial(grammar.augmenting_rule().id()),
        generated: eof_set,
        sources: Default::default(),
    }];
    let keys = kernel_keys(&seed);
    let closed = lr1_closure(seed, grammar, predict, cap);
    let items: Vec<(ItemKey, Lr1ItemData)> = closed.into_iter().collect();
    let potential_contributions = vec![TerminalSet::new(cap); items.len()];
    states.push(State {
        id: 0,
        items,
        transitions: BTreeMap::new(),
        potential_contributions,
    });
    isocores.insert(keys, vec![0]);
    worklist.push_back(0);

    while let Some(state_id) = worklist.pop_front() {
        for (symbol, kernel) in group_successors(&states[state_id as usize], grammar) {
            let keys = kernel_keys(&kernel);
            let closed = lr1_closure(kernel, grammar, predict, cap);
            let existing = isocores.get(&keys).cloned().unwrap_or_default();
            match policy.reconcile(&states, &existing, &closed) {
                MergeDecision::MergeInto(target) => {
                    merge_items(&mut states[target as usize], closed);
                    states[state_id as usize].transitions.insert(symbol, target);
                    lanes.entry(target).or_default().push((state_id, symbol));
                }
                MergeDecision::CreateNew => {
                    let id = states.len() as u32;
                    let items: Vec<(ItemKey, Lr1ItemData)> = closed.into_iter().collect();
                    let potential_contributions = vec![TerminalSet::new(cap); items.len()];
                    states.push(State {
                        id,
                        items,
                        transitions: BTreeMap::new(),
                        potential_contributions,
                    });
                    isocores.entry(keys).or_default().push(id);
                    states[state_id as usize].transitions.insert(symbol, id);
                    lanes.entry(id).or_default().push((state_id, symbol));
                    worklist.push_back(id);
                }
            }
        }
    }
    (states, lanes)
}

/// Plain LR(0) construction, shared by the SLR builder: same DFS shape,
/// no lookaheads carried at all.
pub fn build_lr0(grammar: &Grammar) -> Vec<State> {
    use crate::closure::lr0_closure;
    use std::collections::BTreeSet;

    let mut states: Vec<State> = Vec::new();
    let mut isocores: BTreeMap<KernelKeys, u32> = BTreeMap::new();
    let mut worklist: VecDeque<u32> = VecDeque::new();

    let seed = vec![ItemKey::initial(grammar.augmenting_rule().id())];
    let closed = lr0_closure(&seed, grammar);
    let items: Vec<(ItemKey, Lr1ItemData)> = closed
        .into_iter()
        .map(|k| (k, Lr1ItemData::new(1)))
        .collect();
    let potential_contributions = vec![TerminalSet::new(1); items.len()];
    states.push(State {
        id: 0,
        items,
        transitions: BTreeMap::new(),
        potential_contributions,
    });
    isocores.insert(seed, 0);
    worklist.push_back(0);

    while let Some(state_id) = worklist.pop_front() {
        let mut groups: BTreeMap<Symbol, BTreeSet<ItemKey>> = BTreeMap::new();
        for (key, _) in &states[state_id as usize].items {
            if let Some(sym) = key.next_symbol(grammar) {
                if sym != Symbol::Eof {
                    groups.entry(sym).or_default().insert(key.shifted());
                }
            }
        }
        for (symbol, kernel_set) in groups {
            let kernel: KernelKeys = {
                let mut v: Vec<ItemKey> = kernel_set.into_iter().collect();
                v.sort();
                v
            };
            if let Some(&existing) = isocores.get(&kernel) {
                states[state_id as usize].transitions.insert(symbol, existing);
                continue;
            }
            let closed = lr0_closure(&kernel, grammar);
            let id = states.len() as u32;
            let items: Vec<(ItemKey, Lr1ItemData)> =
                closed.into_iter().map(|k| (k, Lr1ItemData::new(1))).collect();
            let potential_contributions = vec![TerminalSet::new(1); items.len()];
            states.push(State {
                id,
                items,
                transitions: BTreeMap::new(),
                potential_contributions,
            });
            isocores.insert(kernel, id);
            states[state_id as usize].transitions.insert(symbol, id);
            worklist.push_back(id);
        }
    }
    states
}

/// The successor kernel a single predecessor state contributes on
/// `symbol` alone — a single "lane" in LSCELR terms, before any merging
/// with another predecessor's contribution to the same kernel.
pub(crate) fn successor_kernel(
    state: &State,
    symbol: Symbol,
    grammar: &Grammar,
) -> Option<Vec<KernelItem>> {
    group_successors(state, grammar).remove(&symbol)
}

pub(crate) fn group_successors(state: &State, grammar: &Grammar) -> BTreeMap<Symbol, Vec<KernelItem>> {
    let mut groups: BTreeMap<Symbol, Vec<KernelItem>> = BTreeMap::new();
    for (idx, (key, _data)) in state.items.iter().enumerate() {
        let Some(symbol) = key.next_symbol(grammar) else {
            continue;
        };
        if symbol == Symbol::Eof {
            continue;
        }
        groups.entry(symbol).or_default().push(KernelItem {
            key: key.shifted(),
            generated: TerminalSet::new(_data.generated.capacity()),
            sources: std::iter::once(LookaheadSource {
                state: state.id,
                item: idx as u32,
            })
            .collect(),
        });
    }
    for kernel in groups.values_mut() {
        kernel.sort_by_key(|k| k.key);
    }
    groups
}

pub(crate) fn merge_items(state: &mut State, candidate: BTreeMap<ItemKey, Lr1ItemData>) {
    for (key, data) in candidate {
        if let Some((_, existing)) = state.items.iter_mut().find(|(k, _)| *k == key) {
            existing.generated.union_with(&data.generated);
            existing.sources.extend(data.sources);
        }
    }
}

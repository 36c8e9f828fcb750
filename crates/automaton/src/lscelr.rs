// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! LSCELR construction (spec §4.F): build as LALR, detect the conflicts
//! that merge introduced, propagate the offending lookahead contributions
//! back to the states that merged more than one lane together, split
//! exactly those states, and re-merge the fresh successors under a
//! lookahead test masked to the terminals the conflict actually turned on.
//!
//! This preserves the LR(1) language (no conflict canonical LR(1) wouldn't
//! also report) while keeping the state count close to LALR's, since only
//! states whose merge was actually implicated in a conflict ever split.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use grammar::Grammar;
use predict::PredictiveSets;
use symbols::{Symbol, TerminalSet};

use crate::builder::{self, Lanes, MergeDecision, MergePolicy};
use crate::closure::lr1_closure;
use crate::item::{kernel_keys, ItemKey, KernelKeys, Lr1ItemData};
use crate::lookahead;
use crate::state::State;
use crate::variant::LalrMerge;

pub fn build(grammar: &Grammar, predict: &PredictiveSets) -> Vec<State> {
    let cap = predict.terminal_capacity();
    let (mut states, lanes) = builder::build_relational(grammar, predict, &LalrMerge);

    let conflicts = detect_conflicts(grammar, &states, cap);
    let mut potential: Vec<Vec<TerminalSet>> = states
        .iter()
        .map(|s| vec![TerminalSet::new(cap); s.items.len()])
        .collect();
    let mut split_states: BTreeSet<u32> = BTreeSet::new();

    for (state_id, item_idx, contributing) in &conflicts {
        mark_upstream(
            &states,
            *state_id,
            *item_idx,
            contributing,
            &mut potential,
            &mut split_states,
        );
    }

    if !split_states.is_empty() {
        split_and_remerge(grammar, predict, &mut states, &lanes, &potential, &split_states);
    } else if !conflicts.is_empty() {
        log::debug!(
            "LSCELR: {} conflicted item(s) but no merged lane needed splitting",
            conflicts.len()
        );
    }

    for state in states.iter_mut() {
        let len = state.items.len();
        state.potential_contributions = potential
            .get(state.id as usize)
            .cloned()
            .unwrap_or_else(|| vec![TerminalSet::new(cap); len]);
    }

    lookahead::finalize(&mut states, cap);
    states
}

/// For every state with at least one reducing item, resolves effective
/// lookaheads and classifies each terminal's action; any terminal two or
/// more items (or an item and a shift) would act on is a conflict, and
/// every reducing item sharing that terminal gets it recorded against it
/// (spec §4.F step 2).
fn detect_conflicts(grammar: &Grammar, states: &[State], cap: u32) -> Vec<(u32, u32, TerminalSet)> {
    let mut out = Vec::new();
    for state in states {
        let reducing: Vec<(u32, TerminalSet)> = state
            .reducing_items(grammar)
            .map(|(idx, _, data)| {
                (idx, lookahead::effective_lookahead(states, &data.generated, &data.sources, cap))
            })
            .collect();
        if reducing.is_empty() {
            continue;
        }

        let mut contributing: Vec<TerminalSet> = vec![TerminalSet::new(cap); state.items.len()];
        for terminal_id in 0..cap {
            let shifts = state.transitions.keys().any(|&sym| match sym {
                Symbol::Terminal(id) => id == terminal_id,
                Symbol::Eof => terminal_id == symbols::EOF_ID,
                Symbol::NonTerminal(_) => false,
            });
            let reducers: Vec<u32> = reducing
                .iter()
                .filter(|(_, eff)| eff.contains_id(terminal_id))
                .map(|(idx, _)| *idx)
                .collect();
            if reducers.len() + usize::from(shifts) > 1 {
                for &idx in &reducers {
                    contributing[idx as usize].insert_id(terminal_id);
                }
            }
        }

        for (idx, _) in &reducing {
            let contrib = &contributing[*idx as usize];
            if !contrib.is_empty() {
                out.push((state.id, *idx, contrib.clone()));
            }
        }
    }
    out
}

/// Recursively tags every lookahead source of a conflicted item with the
/// part of its contribution not already generated locally (spec §4.F
/// step 3). An item visited along the way that itself has more than one
/// source is evidence its state was LALR-merged from distinct lanes, so
/// that state is marked for splitting.
fn mark_upstream(
    states: &[State],
    state_id: u32,
    item_idx: u32,
    contrib: &TerminalSet,
    potential: &mut [Vec<TerminalSet>],
    split_states: &mut BTreeSet<u32>,
) {
    let (_, data) = &states[state_id as usize].items[item_idx as usize];
    if data.sources.len() > 1 {
        split_states.insert(state_id);
    }

    let upstream = contrib.difference(&data.generated);
    if upstream.is_empty() {
        return;
    }
    for source in data.sources.iter().copied() {
        let changed =
            potential[source.state as usize][source.item as usize].union_report_changed(&upstream);
        if changed {
            mark_upstream(states, source.state, source.item, &upstream, potential, split_states);
        }
    }
}

/// Splits every tagged state's merged lanes apart, re-deriving each
/// lane's successor kernel independently, then re-merges the fresh
/// successors under the masked-lookahead compatibility test (spec §4.F
/// steps 4-5). Only the immediate successors produced by this pass are
/// considered for masked re-merge; anything they in turn transition to is
/// expanded with ordinary LALR merging, since detection and splitting run
/// once here, not to a global fixed point.
fn split_and_remerge(
    grammar: &Grammar,
    predict: &PredictiveSets,
    states: &mut Vec<State>,
    lanes: &Lanes,
    potential: &[Vec<TerminalSet>],
    split_states: &BTreeSet<u32>,
) {
    let cap = predict.terminal_capacity();
    let mut isocores: BTreeMap<KernelKeys, Vec<u32>> = BTreeMap::new();
    for state in states.iter() {
        isocores
            .entry(state_kernel_keys(state, grammar))
            .or_default()
            .push(state.id);
    }
    let mut worklist: VecDeque<u32> = VecDeque::new();

    for &tagged in split_states {
        let Some(lane_list) = lanes.get(&tagged) else {
            continue;
        };
        if lane_list.len() < 2 {
            continue;
        }

        let (primary_pred, primary_symbol) = lane_list[0];
        if let Some(primary_kernel) =
            builder::successor_kernel(&states[primary_pred as usize], primary_symbol, grammar)
        {
            let closed = lr1_closure(primary_kernel, grammar, predict, cap);
            states[tagged as usize].items = closed.into_iter().collect();
        }

        for &(pred, symbol) in &lane_list[1..] {
            let Some(kernel) = builder::successor_kernel(&states[pred as usize], symbol, grammar)
            else {
                continue;
            };
            let keys = kernel_keys(&kernel);
            let closed = lr1_closure(kernel, grammar, predict, cap);
            let candidates = isocores.get(&keys).cloned().unwrap_or_default();
            let reuse = candidates
                .iter()
                .copied()
                .find(|&id| id != tagged && masked_equal(states, id, &closed, potential, cap));

            let target = if let Some(id) = reuse {
                builder::merge_items(&mut states[id as usize], closed);
                id
            } else {
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
                worklist.push_back(id);
                id
            };
            states[pred as usize].transitions.insert(symbol, target);
        }
    }

    while let Some(state_id) = worklist.pop_front() {
        for (symbol, kernel) in builder::group_successors(&states[state_id as usize], grammar) {
            let keys = kernel_keys(&kernel);
            let closed = lr1_closure(kernel, grammar, predict, cap);
            let existing = isocores.get(&keys).cloned().unwrap_or_default();
            match LalrMerge.reconcile(states, &existing, &closed) {
                MergeDecision::MergeInto(target) => {
                    builder::merge_items(&mut states[target as usize], closed);
                    states[state_id as usize].transitions.insert(symbol, target);
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
                    worklist.push_back(id);
                }
            }
        }
    }
}

/// A built state's kernel keys: the items with `mark > 0`, plus the sole
/// (mark-0) item of the start state (spec §3's definition of a state's
/// identity) — the same notion [`kernel_keys`] computes from a pre-closure
/// kernel, recovered here from an already-closed state's item list.
fn state_kernel_keys(state: &State, grammar: &Grammar) -> KernelKeys {
    let start_item = ItemKey::initial(grammar.augmenting_rule().id());
    let mut keys: Vec<ItemKey> = state
        .items
        .iter()
        .map(|(k, _)| *k)
        .filter(|k| k.mark > 0 || *k == start_item)
        .collect();
    keys.sort();
    keys
}

/// Two isocores may merge iff their effective lookaheads, masked by
/// whatever potential-contribution set was recorded for `existing_id`,
/// are equal (spec §4.F step 5). An item with no recorded mask falls
/// back to comparing the unmasked effective lookahead outright, so a
/// split state doesn't re-merge back into something its own conflict
/// didn't implicate.
fn masked_equal(
    states: &[State],
    existing_id: u32,
    candidate: &BTreeMap<ItemKey, Lr1ItemData>,
    potential: &[Vec<TerminalSet>],
    cap: u32,
) -> bool {
    let existing = &states[existing_id as usize];
    if existing.items.len() != candidate.len() {
        return false;
    }
    let masks = potential.get(existing_id as usize);
    for (idx, (key, existing_data)) in existing.items.iter().enumerate() {
        let Some(candidate_data) = candidate.get(key) else {
            return false;
        };
        let existing_eff =
            lookahead::effective_lookahead(states, &existing_data.generated, &existing_data.sources, cap);
        let candidate_eff = lookahead::effective_lookahead(
            states,
            &candidate_data.generated,
            &candidate_data.sources,
            cap,
        );
        match masks.and_then(|m| m.get(idx)).filter(|m| !m.is_empty()) {
            Some(mask) => {
                if existing_eff.intersection(mask) != candidate_eff.intersection(mask) {
                    return false;
                }
            }
            None => {
                if existing_eff != candidate_eff {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::{PrecedenceTable, RuleSpec};
    use symbols::Symbol;

    fn nt(id: u32) -> Symbol {
        Symbol::NonTerminal(id)
    }
    fn t(id: u32) -> Symbol {
        Symbol::Terminal(id)
    }

    // The classic LALR-vs-canonical-LR divergence grammar (Aho/Ullman-shaped):
    // S -> A a | B b | D c | E b
    // A -> D
    // B -> D
    // D -> d
    // E -> d
    // LALR merges the `D -> d .` and `E -> d .` isocores into one state and
    // reports a reduce/reduce conflict on lookahead `b`; canonical LR(1)
    // keeps them apart and resolves cleanly. LSCELR should too.
    fn lalr_lr1_divergence_grammar() -> Grammar {
        let specs = vec![
            RuleSpec::identity(0, vec![nt(1), t(1)]), // S -> A a
            RuleSpec::identity(0, vec![nt(2), t(2)]), // S -> B b
            RuleSpec::identity(0, vec![nt(3), t(3)]), // S -> D c
            RuleSpec::identity(0, vec![nt(4), t(2)]), // S -> E b
            RuleSpec::identity(1, vec![nt(3)]),       // A -> D
            RuleSpec::identity(2, vec![nt(3)]),       // B -> D
            RuleSpec::identity(3, vec![t(4)]),        // D -> d
            RuleSpec::identity(4, vec![t(4)]),        // E -> d
        ];
        Grammar::new(
            specs,
            0,
            vec!["S".into(), "A".into(), "B".into(), "D".into(), "E".into()],
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            PrecedenceTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn splits_the_lane_lalr_collapses() {
        let grammar = lalr_lr1_divergence_grammar();
        let predict = PredictiveSets::compute(&grammar);
        let lscelr = build(&grammar, &predict);
        let lalr = crate::builder::build_relational(&grammar, &predict, &LalrMerge).0;

        assert!(
            lscelr.len() > lalr.len(),
            "LSCELR should split at least the isocore LALR collapsed"
        );

        let table = crate::table::Table::build(&grammar, &lscelr, crate::table::ConflictPolicy::Strict);
        assert!(table.is_ok(), "LSCELR must not report the spurious LALR conflict");
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::collections::BTreeMap;

use crate::builder::{MergeDecision, MergePolicy};
use crate::item::{ItemKey, Lr1ItemData};
use crate::state::State;

/// Which automaton construction to run (spec §4.F, plus SLR as a
/// supplemental fourth variant carried over from the original lookahead
/// scheme).
///
/// `Lscelr` doesn't go through [`MergePolicy`] at all — its construction
/// (`crate::lscelr`) builds as LALR first and then runs its own
/// conflict-detection/split/re-merge pipeline over the result (spec
/// §4.F), since "merge unless it would be lossy" can't be decided from a
/// single candidate-vs-isocore comparison the way the other three can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LrVariant {
    Slr,
    Lalr,
    CanonicalLr1,
    Lscelr,
}

/// LALR(1): every isocore is a single state; lookaheads from every
/// transition into it are simply unioned together.
pub struct LalrMerge;

impl MergePolicy for LalrMerge {
    fn reconcile(
        &self,
        _states: &[State],
        isocore_ids: &[u32],
        _candidate: &BTreeMap<ItemKey, Lr1ItemData>,
    ) -> MergeDecision {
        match isocore_ids.first() {
            Some(&id) => MergeDecision::MergeInto(id),
            None => MergeDecision::CreateNew,
        }
    }
}

/// Canonical LR(1): isocores with the same item set (keys *and*
/// lookaheads) are the same state; anything else is a distinct one, so
/// the construction never loses precision.
pub struct CanonicalMerge;

impl MergePolicy for CanonicalMerge {
    fn reconcile(
        &self,
        states: &[State],
        isocore_ids: &[u32],
        candidate: &BTreeMap<ItemKey, Lr1ItemData>,
    ) -> MergeDecision {
        for &id in isocore_ids {
            let existing = &states[id as usize];
            let matches = existing.items.len() == candidate.len()
                && existing
                    .items
                    .iter()
                    .all(|(k, d)| candidate.get(k).map(|c| c == d).unwrap_or(false));
            if matches {
                return MergeDecision::MergeInto(id);
            }
        }
        MergeDecision::CreateNew
    }
}

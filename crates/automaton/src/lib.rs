// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! LR(0)/SLR/LALR/canonical-LR(1)/LSCELR automaton construction and the
//! action/goto table (spec §4.E-§4.G).
//!
//! [`build`] runs whichever variant [`LrVariant`] names and hands back a
//! finalized [`Automaton`] (every item's lookahead resolved to a literal
//! [`symbols::TerminalSet`], ready for [`Table::build`]).

mod builder;
mod closure;
mod item;
mod lookahead;
mod lscelr;
mod serialize;
mod state;
mod table;
mod variant;

pub use item::{ItemKey, LookaheadSource};
pub use serialize::{read_table, write_table, SerializeError};
pub use state::State;
pub use table::{Action, Conflict, ConflictPolicy, Row, Table, TableError};
pub use variant::LrVariant;

use grammar::Grammar;
use predict::PredictiveSets;

/// A finalized automaton: every state's items carry a literal lookahead
/// set, no unresolved sources remain.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    variant: LrVariant,
}

impl Automaton {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: u32) -> &State {
        &self.states[id as usize]
    }

    pub fn variant(&self) -> LrVariant {
        self.variant
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// Builds the automaton for `grammar` under `variant`, resolving every
/// item's effective lookahead before returning.
pub fn build(grammar: &Grammar, predict: &PredictiveSets, variant: LrVariant) -> Automaton {
    let mut states = match variant {
        LrVariant::Slr => builder::build_lr0(grammar),
        LrVariant::Lalr => builder::build_relational(grammar, predict, &variant::LalrMerge).0,
        LrVariant::CanonicalLr1 => {
            builder::build_relational(grammar, predict, &variant::CanonicalMerge).0
        }
        // LSCELR already returns a finalized automaton: its own pipeline
        // resolves lookaheads after splitting, see `lscelr::build`.
        LrVariant::Lscelr => lscelr::build(grammar, predict),
    };

    match variant {
        LrVariant::Slr => slr_fill_follow(&mut states, grammar, predict),
        LrVariant::Lscelr => {}
        _ => lookahead::finalize(&mut states, predict.terminal_capacity()),
    }

    log::info!(
        "{:?} automaton built: {} states",
        variant,
        states.len()
    );
    Automaton { states, variant }
}

/// SLR doesn't carry per-item lookaheads at all: a reducing item's
/// lookahead is simply FOLLOW(lhs), read off the shared predictive sets.
fn slr_fill_follow(states: &mut [State], grammar: &Grammar, predict: &PredictiveSets) {
    for state in states.iter_mut() {
        for (key, data) in state.items.iter_mut() {
            if key.is_reducing(grammar) {
                let lhs = grammar.rule(key.rule_id).lhs();
                data.generated = predict.follow(lhs).clone();
            }
        }
    }
}

/// Builds the action/goto [`Table`] for an already-constructed [`Automaton`].
pub fn build_table(
    grammar: &Grammar,
    automaton: &Automaton,
    policy: ConflictPolicy,
) -> Result<Table, TableError> {
    Table::build(grammar, &automaton.states, policy)
}

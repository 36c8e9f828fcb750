// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::collections::BTreeMap;
use std::fmt;

use grammar::Grammar;
use symbols::{Symbol, TerminalSet};

use crate::item::{ItemKey, Lr1ItemData};

/// One state of the automaton: its closed item set (sorted by [`ItemKey`])
/// and its outgoing transitions, keyed by the symbol that is shifted or
/// goto'd across.
#[derive(Debug, Clone)]
pub struct State {
    pub id: u32,
    pub items: Vec<(ItemKey, Lr1ItemData)>,
    pub transitions: BTreeMap<Symbol, u32>,
    /// Per-item terminals LSCELR's conflict pass found to originate from a
    /// lookahead lane this state's LALR-style merge collapsed together
    /// (spec §4.F step 3, §5). Indexed in parallel with `items`; empty sets
    /// throughout for every state built by a variant other than
    /// [`crate::LrVariant::Lscelr`], and for any item no conflict reached.
    pub potential_contributions: Vec<TerminalSet>,
}

impl State {
    pub fn item_index(&self, key: ItemKey) -> Option<u32> {
        self.items
            .iter()
            .position(|(k, _)| *k == key)
            .map(|i| i as u32)
    }

    pub fn has_reduce(&self, grammar: &Grammar) -> bool {
        self.items.iter().any(|(k, _)| k.is_reducing(grammar))
    }

    pub fn reducing_items<'a>(
        &'a self,
        grammar: &'a Grammar,
    ) -> impl Iterator<Item = (u32, &'a ItemKey, &'a Lr1ItemData)> + 'a {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, (k, _))| k.is_reducing(grammar))
            .map(|(idx, (k, d))| (idx as u32, k, d))
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> StateDisplay<'a> {
        StateDisplay { state: self, grammar }
    }
}

pub struct StateDisplay<'a> {
    state: &'a State,
    grammar: &'a Grammar,
}

impl fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "state {}", self.state.id)?;
        for (key, _) in &self.state.items {
            let rule = self.grammar.rule(key.rule_id);
            write!(f, "  {} ->", self.grammar.symbol_name(Symbol::NonTerminal(rule.lhs())))?;
            for (i, sym) in rule.input().iter().enumerate() {
                if i as u32 == key.mark {
                    write!(f, " .")?;
                }
                write!(f, " {}", self.grammar.symbol_name(*sym))?;
            }
            if key.mark as usize == rule.input().len() {
                write!(f, " .")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

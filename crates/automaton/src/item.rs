// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::cmp::Ordering;
use std::collections::BTreeSet;

use grammar::Grammar;
use symbols::{Symbol, TerminalSet};

/// An LR(0) item identity: rule and mark position. Two items with the same
/// key are the same item, possibly carrying different lookaheads in
/// different states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub rule_id: u32,
    pub mark: u32,
}

impl ItemKey {
    pub fn initial(rule_id: u32) -> Self {
        ItemKey { rule_id, mark: 0 }
    }

    pub fn shifted(&self) -> Self {
        ItemKey {
            rule_id: self.rule_id,
            mark: self.mark + 1,
        }
    }

    pub fn is_reducing(&self, grammar: &Grammar) -> bool {
        self.mark as usize == grammar.rule(self.rule_id).input_len()
    }

    /// The symbol immediately to the right of the mark, if any.
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar
            .rule(self.rule_id)
            .input()
            .get(self.mark as usize)
            .copied()
    }
}

// Reducing items (mark at the far right) sort before shift items, and
// among shift items the higher the mark the earlier it sorts: this puts
// "closer to completion" items first.
impl Ord for ItemKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .mark
            .cmp(&self.mark)
            .then_with(|| self.rule_id.cmp(&other.rule_id))
    }
}

impl PartialOrd for ItemKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An index into another state's item list: `(state, item)`, where `item`
/// is the position of the item within that state's sorted item vector.
/// Used instead of copying lookahead sets directly so that a later merge
/// of the source state is automatically visible to everything that reads
/// through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookaheadSource {
    pub state: u32,
    pub item: u32,
}

/// The lookahead contribution carried by one item: terminals generated
/// directly by closure (FIRST of what follows it) plus a set of sources to
/// resolve lazily for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lr1ItemData {
    pub generated: TerminalSet,
    pub sources: BTreeSet<LookaheadSource>,
}

impl Lr1ItemData {
    pub fn new(capacity: u32) -> Self {
        Lr1ItemData {
            generated: TerminalSet::new(capacity),
            sources: BTreeSet::new(),
        }
    }
}

/// A single item contributed to a successor state's kernel by a shift
/// across one symbol.
#[derive(Debug, Clone)]
pub struct KernelItem {
    pub key: ItemKey,
    pub generated: TerminalSet,
    pub sources: BTreeSet<LookaheadSource>,
}

/// A kernel: the set of items that seed a state before closure, sorted by
/// key. Two states are isocores of one another iff their kernel keys
/// (ignoring lookaheads) are equal.
pub type KernelKeys = Vec<ItemKey>;

pub fn kernel_keys(kernel: &[KernelItem]) -> KernelKeys {
    let mut keys: Vec<ItemKey> = kernel.iter().map(|k| k.key).collect();
    keys.sort();
    keys
}

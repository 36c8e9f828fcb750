// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Closure of an item kernel (spec §4.E): the LR(0) form used by the SLR
//! builder, and the relational LR(1) form (generated sets plus lookahead
//! sources) shared by canonical LR(1), LALR and LSCELR.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use grammar::Grammar;
use predict::PredictiveSets;
use symbols::Symbol;

use crate::item::{ItemKey, KernelItem, Lr1ItemData};

/// Plain LR(0) closure: add `X -> .gamma` for every nonterminal `X`
/// immediately after the mark, repeating until nothing new appears.
pub fn lr0_closure(seed: &[ItemKey], grammar: &Grammar) -> BTreeSet<ItemKey> {
    let mut items: BTreeSet<ItemKey> = seed.iter().copied().collect();
    let mut worklist: Vec<ItemKey> = items.iter().copied().collect();
    while let Some(key) = worklist.pop() {
        if let Some(Symbol::NonTerminal(x)) = key.next_symbol(grammar) {
            for rule in grammar.rules().iter().filter(|r| r.lhs() == x) {
                let candidate = ItemKey::initial(rule.id());
                if items.insert(candidate) {
                    worklist.push(candidate);
                }
            }
        }
    }
    items
}

/// Relational LR(1) closure. For an item `A -> alpha . X beta` with
/// generated set `L_g` and sources `L_s`, every `X -> .gamma` added to the
/// closure is generated by `FIRST(beta)`; if `beta` is nullable that
/// item also inherits `L_g` and `L_s` directly, since what follows `X`
/// in this context is itself then "whatever can follow the item being
/// closed over".
pub fn lr1_closure(
    seed: Vec<KernelItem>,
    grammar: &Grammar,
    predict: &PredictiveSets,
    terminal_capacity: u32,
) -> BTreeMap<ItemKey, Lr1ItemData> {
    let mut items: BTreeMap<ItemKey, Lr1ItemData> = BTreeMap::new();
    let mut worklist: VecDeque<ItemKey> = VecDeque::new();
    for kernel_item in seed {
        let entry = items
            .entry(kernel_item.key)
            .or_insert_with(|| Lr1ItemData::new(terminal_capacity));
        entry.generated.union_with(&kernel_item.generated);
        entry.sources.extend(kernel_item.sources.iter().copied());
        worklist.push_back(kernel_item.key);
    }

    while let Some(key) = worklist.pop_front() {
        let Some(Symbol::NonTerminal(x)) = key.next_symbol(grammar) else {
            continue;
        };
        let rule = grammar.rule(key.rule_id);
        let beta = &rule.input()[key.mark as usize + 1..];
        let first_beta = predict.first_of_sequence(beta);

        let data = items.get(&key).expect("key was just queued from this map");
        let mut l_gen = first_beta.symbols;
        let mut l_src: BTreeSet<crate::item::LookaheadSource> = BTreeSet::new();
        if first_beta.nullable {
            l_gen.union_with(&data.generated);
            l_src = data.sources.clone();
        }

        for target_rule in grammar.rules().iter().filter(|r| r.lhs() == x) {
            let new_key = ItemKey::initial(target_rule.id());
            let entry = items
                .entry(new_key)
                .or_insert_with(|| Lr1ItemData::new(terminal_capacity));
            let mut changed = entry.generated.union_report_changed(&l_gen);
            let before = entry.sources.len();
            entry.sources.extend(l_src.iter().copied());
            changed |= entry.sources.len() != before;
            if changed {
                worklist.push_back(new_key);
            }
        }
    }
    items
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

    // S -> A a | a ; A -> ε
    fn sample_grammar() -> Grammar {
        let specs = vec![
            RuleSpec::identity(0, vec![nt(1), t(1)]),
            RuleSpec::identity(0, vec![t(1)]),
            RuleSpec::identity(1, vec![]),
        ];
        Grammar::new(
            specs,
            0,
            vec!["S".into(), "A".into()],
            vec!["a".into()],
            PrecedenceTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn lr0_closure_adds_every_alternative_of_start() {
        let grammar = sample_grammar();
        let seed = vec![ItemKey::initial(grammar.augmenting_rule().id())];
        let closed = lr0_closure(&seed, &grammar);
        assert!(closed.contains(&ItemKey::initial(0)));
        assert!(closed.contains(&ItemKey::initial(1)));
        assert!(closed.contains(&ItemKey::initial(2))); // A -> .
    }

    #[test]
    fn lr1_closure_generates_lookahead_for_nullable_a() {
        let grammar = sample_grammar();
        let predict = PredictiveSets::compute(&grammar);
        let cap = predict.terminal_capacity();
        let seed = vec![KernelItem {
            key: ItemKey::initial(grammar.augmenting_rule().id()),
            generated: symbols::TerminalSet::new(cap),
            sources: Default::default(),
        }];
        let closed = lr1_closure(seed, &grammar, &predict, cap);
        let a_item = closed.get(&ItemKey::initial(2)).unwrap();
        assert!(a_item.generated.contains(t(1)));
    }
}

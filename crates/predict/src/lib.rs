// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! EMPTY / FIRST / FOLLOW / PREDICT fixed-point computation (spec §4.D).
//!
//! All four are monotone fixed points over a frozen [`Grammar`]: EMPTY and
//! FIRST/FOLLOW sets only ever grow, so repeated passes that add whatever
//! they can and stop when nothing changed are guaranteed to terminate.

use grammar::Grammar;
use symbols::{Symbol, TerminalSet};

/// The four predictive sets for a grammar, computed once and then frozen
/// alongside it.
#[derive(Debug, Clone)]
pub struct PredictiveSets {
    empty: Vec<bool>,
    first: Vec<TerminalSet>,
    follow: Vec<TerminalSet>,
    terminal_capacity: u32,
}

/// The result of computing FIRST over a symbol sequence: the terminals
/// that can start it, and whether the whole sequence is nullable.
#[derive(Debug, Clone)]
pub struct FirstResult {
    pub symbols: TerminalSet,
    pub nullable: bool,
}

impl PredictiveSets {
    pub fn compute(grammar: &Grammar) -> PredictiveSets {
        let terminal_capacity = grammar.terminal_count() + 1;
        let n = grammar.non_terminal_count() as usize;
        let mut sets = PredictiveSets {
            empty: vec![false; n],
            first: vec![TerminalSet::new(terminal_capacity); n],
            follow: vec![TerminalSet::new(terminal_capacity); n],
            terminal_capacity,
        };
        sets.compute_empty(grammar);
        sets.compute_first(grammar);
        sets.compute_follow(grammar);
        sets
    }

    fn compute_empty(&mut self, grammar: &Grammar) {
        let mut iterations = 0;
        loop {
            let mut changed = false;
            for rule in grammar.rules() {
                let lhs = rule.lhs() as usize;
                if self.empty[lhs] {
                    continue;
                }
                let derives_empty = rule
                    .input()
                    .iter()
                    .all(|s| matches!(s, Symbol::NonTerminal(id) if self.empty[*id as usize]));
                if derives_empty {
                    self.empty[lhs] = true;
                    changed = true;
                }
            }
            iterations += 1;
            if !changed {
                break;
            }
        }
        log::debug!("EMPTY fixed point reached after {} iterations", iterations);
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        let mut iterations = 0;
        loop {
            let mut changed = false;
            for rule in grammar.rules() {
                let lhs = rule.lhs() as usize;
                for symbol in rule.input() {
                    match symbol {
                        Symbol::Terminal(_) | Symbol::Eof => {
                            let mut terminal_set = TerminalSet::new(self.terminal_capacity);
                            terminal_set.insert(*symbol);
                            if self.first[lhs].union_report_changed(&terminal_set) {
                                changed = true;
                            }
                            break;
                        }
                        Symbol::NonTerminal(id) => {
                            let rhs = self.first[*id as usize].clone();
                            if self.first[lhs].union_report_changed(&rhs) {
                                changed = true;
                            }
                            if !self.empty[*id as usize] {
                                break;
                            }
                        }
                    }
                }
            }
            iterations += 1;
            if !changed {
                break;
            }
        }
        log::debug!("FIRST fixed point reached after {} iterations", iterations);
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        let mut eof_set = TerminalSet::new(self.terminal_capacity);
        eof_set.insert(Symbol::Eof);
        self.follow[grammar.start() as usize].union_with(&eof_set);

        let mut iterations = 0;
        loop {
            let mut changed = false;
            for rule in grammar.rules() {
                let input = rule.input();
                for (index, symbol) in input.iter().enumerate() {
                    let Symbol::NonTerminal(b) = symbol else {
                        continue;
                    };
                    let beta = &input[index + 1..];
                    let FirstResult { symbols, nullable } = self.first_of_sequence(beta);
                    if self.follow[*b as usize].union_report_changed(&symbols) {
                        changed = true;
                    }
                    if nullable {
                        let follow_a = self.follow[rule.lhs() as usize].clone();
                        if self.follow[*b as usize].union_report_changed(&follow_a) {
                            changed = true;
                        }
                    }
                }
            }
            iterations += 1;
            if !changed {
                break;
            }
        }
        log::debug!("FOLLOW fixed point reached after {} iterations", iterations);
    }

    /// FIRST of a symbol sequence: walk left to right, accumulating
    /// FIRST(Xi) while the prefix so far is nullable; a terminal
    /// contributes itself and stops the walk. `nullable` is true iff the
    /// whole sequence can derive the empty string.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> FirstResult {
        let mut result = TerminalSet::new(self.terminal_capacity);
        for symbol in symbols {
            match symbol {
                Symbol::Terminal(_) | Symbol::Eof => {
                    result.insert(*symbol);
                    return FirstResult {
                        symbols: result,
                        nullable: false,
                    };
                }
                Symbol::NonTerminal(id) => {
                    result.union_with(&self.first[*id as usize]);
                    if !self.empty[*id as usize] {
                        return FirstResult {
                            symbols: result,
                            nullable: false,
                        };
                    }
                }
            }
        }
        FirstResult {
            symbols: result,
            nullable: true,
        }
    }

    pub fn is_nullable(&self, non_terminal: u32) -> bool {
        self.empty[non_terminal as usize]
    }

    pub fn first(&self, non_terminal: u32) -> &TerminalSet {
        &self.first[non_terminal as usize]
    }

    pub fn follow(&self, non_terminal: u32) -> &TerminalSet {
        &self.follow[non_terminal as usize]
    }

    pub fn terminal_capacity(&self) -> u32 {
        self.terminal_capacity
    }

    /// PREDICT(rule): `FIRST(rhs)`, plus `FOLLOW(lhs)` when the whole rhs
    /// is nullable. Used by the LL driver and LL-style table construction.
    pub fn predict(&self, rule: &grammar::Rule) -> TerminalSet {
        let FirstResult { mut symbols, nullable } = self.first_of_sequence(rule.input());
        if nullable {
            symbols.union_with(self.follow(rule.lhs()));
        }
        symbols
    }
}

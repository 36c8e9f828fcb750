// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The alternate LL predictive driver (spec §4.I): a top-down variant
//! over the same grammar, built from PREDICT sets instead of an
//! automaton. Offered for grammars that happen to be LL; the LR driver
//! remains the primary path.

use std::collections::BTreeMap;
use std::fmt;

use grammar::Grammar;
use predict::PredictiveSets;
use symbols::Symbol;

use crate::attribute::Token;
use crate::cell::{expand_rule_leftmost, route_attribute, InputCell, OutputCell};
use crate::error::DriverError;
use crate::pushdown::Pushdown;

/// How an LL table resolves a nonterminal predicting the same terminal
/// from more than one rule (spec §4.I).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlVariant {
    /// A PREDICT-set collision between two rules is a build-time fault:
    /// the grammar isn't LL(1) under this table.
    Unique,
    /// The first-declared rule (lowest id) wins; later colliding rules
    /// are silently shadowed.
    Priority,
    /// Every colliding rule is kept; the driver tries them in declaration
    /// order and backtracks on mismatch.
    Nondeterministic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlConflict {
    pub lhs: u32,
    pub terminal: Symbol,
    pub first_rule: u32,
    pub second_rule: u32,
}

impl fmt::Display for LlConflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "nonterminal N{} predicts rule {} and rule {} on the same terminal {}",
            self.lhs, self.first_rule, self.second_rule, self.terminal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlTableError {
    pub conflicts: Vec<LlConflict>,
}

impl fmt::Display for LlTableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "grammar is not LL(1) under a unique table:")?;
        for conflict in &self.conflicts {
            writeln!(f, "  {}", conflict)?;
        }
        Ok(())
    }
}

impl std::error::Error for LlTableError {}

/// `(nonterminal, terminal) -> [rule_id, ...]`, in declaration order.
/// Only [`LlVariant::Nondeterministic`] ever stores more than one rule
/// per key.
#[derive(Debug, Clone)]
pub struct LlTable {
    entries: BTreeMap<(u32, u32), Vec<u32>>,
}

impl LlTable {
    pub fn build(
        grammar: &Grammar,
        predict: &PredictiveSets,
        variant: LlVariant,
    ) -> Result<LlTable, LlTableError> {
        let mut entries: BTreeMap<(u32, u32), Vec<u32>> = BTreeMap::new();
        let mut conflicts = Vec::new();

        for rule in grammar.rules() {
            let predicted = predict.predict(rule);
            for terminal_id in predicted.iter_ids() {
                let key = (rule.lhs(), terminal_id);
                match entries.get_mut(&key) {
                    None => {
                        entries.insert(key, vec![rule.id()]);
                    }
                    Some(existing) => {
                        let terminal = if terminal_id == symbols::EOF_ID {
                            Symbol::Eof
                        } else {
                            Symbol::Terminal(terminal_id)
                        };
                        conflicts.push(LlConflict {
                            lhs: rule.lhs(),
                            terminal,
                            first_rule: existing[0],
                            second_rule: rule.id(),
                        });
                        match variant {
                            LlVariant::Unique => {}
                            LlVariant::Priority => {}
                            LlVariant::Nondeterministic => existing.push(rule.id()),
                        }
                    }
                }
            }
        }

        if variant == LlVariant::Unique && !conflicts.is_empty() {
            return Err(LlTableError { conflicts });
        }
        log::info!(
            "LL table built ({:?}): {} entr(y/ies), {} conflict(s)",
            variant,
            entries.len(),
            conflicts.len()
        );
        Ok(LlTable { entries })
    }

    /// The rule alternatives predicted for `(nonterminal, terminal)`, in
    /// declaration order, or an empty slice if none predict it.
    pub fn rules_for(&self, nonterminal: u32, terminal: Symbol) -> &[u32] {
        self.entries
            .get(&(nonterminal, terminal.terminal_id()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A snapshot of driver state taken just before trying one of several
/// predicted alternatives, so a later mismatch can roll back and try the
/// next one (spec §4.I "nondeterministic LL").
struct Branch {
    input: Pushdown<InputCell>,
    output: Pushdown<OutputCell>,
    cursor: usize,
    remaining_rules: Vec<u32>,
}

pub struct LlDriver<'g> {
    grammar: &'g Grammar,
    table: &'g LlTable,
}

impl<'g> LlDriver<'g> {
    pub fn new(grammar: &'g Grammar, table: &'g LlTable) -> Self {
        Self { grammar, table }
    }

    /// Parses a fully materialized token sequence (the nondeterministic
    /// variant needs to rewind, so this driver isn't pull-style like the
    /// LR one). `tokens` must end with an EOF token.
    pub fn parse(&self, tokens: &[Token]) -> Result<Vec<Token>, DriverError> {
        let start = Symbol::NonTerminal(self.grammar.start());
        let mut input: Pushdown<InputCell> = Pushdown::singleton(InputCell {
            symbol: start,
            targets: Vec::new(),
        });
        let mut output: Pushdown<OutputCell> = Pushdown::singleton(OutputCell::new(start));
        let mut cursor = 0usize;
        let mut backtrack: Vec<Branch> = Vec::new();

        loop {
            match self.step(&mut input, &mut output, &mut cursor, tokens, &mut backtrack) {
                Ok(true) => {
                    return Ok(output
                        .into_vec()
                        .into_iter()
                        .map(|cell| Token::new(cell.symbol, cell.attribute, cell.location))
                        .collect())
                }
                Ok(false) => continue,
                Err(err) => {
                    if let Some(branch) = backtrack.pop() {
                        input = branch.input;
                        output = branch.output;
                        cursor = branch.cursor;
                        let rule_id = branch.remaining_rules[0];
                        if branch.remaining_rules.len() > 1 {
                            backtrack.push(Branch {
                                input: input.clone(),
                                output: output.clone(),
                                cursor,
                                remaining_rules: branch.remaining_rules[1..].to_vec(),
                            });
                        }
                        expand_rule_leftmost(&mut input, &mut output, self.grammar.rule(rule_id));
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Advances the parse by one step. `Ok(true)` means the input
    /// pushdown emptied (done); `Ok(false)` means keep looping; `Err`
    /// means the current branch failed.
    fn step(
        &self,
        input: &mut Pushdown<InputCell>,
        output: &mut Pushdown<OutputCell>,
        cursor: &mut usize,
        tokens: &[Token],
        backtrack: &mut Vec<Branch>,
    ) -> Result<bool, DriverError> {
        let Some(front) = input.front() else {
            return Ok(true);
        };
        let token = &tokens[(*cursor).min(tokens.len() - 1)];

        if front.symbol.is_terminal() {
            if front.symbol != token.symbol() {
                log::warn!(
                    "syntax error at {}: expected {}, found {}",
                    token.location(),
                    front.symbol,
                    token.symbol()
                );
                return Err(DriverError::Syntax {
                    found: token.symbol(),
                    location: token.location().clone(),
                    expected: vec![front.symbol],
                });
            }
            log::debug!("match {} at {}", front.symbol, token.location());
            let cell = input.pop_front().expect("front just matched");
            route_attribute(output, &cell, token);
            *cursor += 1;
            return Ok(false);
        }

        let nonterminal = front.symbol.non_terminal_id();
        let alternatives = self.table.rules_for(nonterminal, token.symbol());
        match alternatives {
            [] => {
                log::warn!(
                    "syntax error at {}: N{} has no rule predicted on {}",
                    token.location(),
                    nonterminal,
                    token.symbol()
                );
                Err(DriverError::Syntax {
                    found: token.symbol(),
                    location: token.location().clone(),
                    expected: Vec::new(),
                })
            }
            [only] => {
                log::debug!("N{}: predict rule {}", nonterminal, only);
                expand_rule_leftmost(input, output, self.grammar.rule(*only));
                Ok(false)
            }
            many => {
                log::debug!("N{}: {} alternative(s), trying rule {}", nonterminal, many.len(), many[0]);
                if many.len() > 1 {
                    backtrack.push(Branch {
                        input: input.clone(),
                        output: output.clone(),
                        cursor: *cursor,
                        remaining_rules: many[1..].to_vec(),
                    });
                }
                expand_rule_leftmost(input, output, self.grammar.rule(many[0]));
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use grammar::{PrecedenceTable, RuleSpec};
    use symbols::Location;

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
    fn unique_variant_rejects_an_ambiguous_rule_set() {
        let grammar = sample_grammar();
        let predict = PredictiveSets::compute(&grammar);
        // Both `S -> A a` (via nullable A) and `S -> a` predict on `a`.
        let err = LlTable::build(&grammar, &predict, LlVariant::Unique).unwrap_err();
        assert!(!err.conflicts.is_empty());
    }

    #[test]
    fn nondeterministic_variant_backtracks_to_a_working_alternative() {
        let grammar = sample_grammar();
        let predict = PredictiveSets::compute(&grammar);
        let table = LlTable::build(&grammar, &predict, LlVariant::Nondeterministic).unwrap();
        let driver = LlDriver::new(&grammar, &table);

        let loc = Location::new("in", 1, 1);
        let tokens = vec![
            Token::new(t(1), Attribute::None, loc.clone()),
            Token::new(Symbol::Eof, Attribute::None, loc),
        ];
        let output = driver.parse(&tokens).unwrap();
        assert_eq!(output.last().unwrap().symbol(), Symbol::Eof);
    }
}

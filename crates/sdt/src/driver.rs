// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The LR parse driver (spec §4.H): a shift-reduce loop over a frozen
//! grammar and table, followed by a reverse-replay pass that turns the
//! applied-rule log into the attributed output stream.

use automaton::{Action, Table};
use grammar::Grammar;
use symbols::Symbol;

use crate::attribute::Token;
use crate::cell::{expand_rule_rightmost, route_attribute, InputCell, OutputCell};
use crate::error::DriverError;
use crate::io::TokenSource;
use crate::pushdown::Pushdown;

/// Drives one parse at a time over a shared, read-only grammar and table
/// (spec §5: a driver instance owns its own pushdowns and token buffer;
/// grammar and table are never mutated).
pub struct Driver<'g> {
    grammar: &'g Grammar,
    table: &'g Table,
}

impl<'g> Driver<'g> {
    pub fn new(grammar: &'g Grammar, table: &'g Table) -> Self {
        Self { grammar, table }
    }

    /// Runs the shift-reduce loop to completion, then reverse-replays the
    /// rule log into the attributed output stream. On a syntax error the
    /// loop halts immediately; no recovery is attempted (spec §4.H, §7.4).
    pub fn parse(&self, source: &mut dyn TokenSource) -> Result<Vec<Token>, DriverError> {
        let mut state_stack: Vec<u32> = vec![0];
        let mut rule_log: Vec<u32> = Vec::new();
        let mut consumed: Vec<Token> = Vec::new();
        let mut current = source.next_token();

        loop {
            let top = *state_stack.last().expect("state stack is never empty");
            match self.table.action(top, current.symbol()) {
                Some(Action::Shift(next)) => {
                    log::debug!("state {}: shift {} -> state {}", top, current.symbol(), next);
                    state_stack.push(next);
                    consumed.push(current.clone());
                    current = source.next_token();
                }
                Some(Action::Reduce(rule_id)) => {
                    let rule = self.grammar.rule(rule_id);
                    let new_height = state_stack.len() - rule.input_len();
                    state_stack.truncate(new_height);
                    let under = *state_stack.last().expect("state stack is never empty");
                    let next = self
                        .table
                        .goto(under, rule.lhs())
                        .expect("a reduced rule's lhs always has a goto from the exposed state");
                    log::debug!(
                        "state {}: reduce by rule {} -> goto {} -> state {}",
                        top,
                        rule_id,
                        rule.lhs(),
                        next
                    );
                    state_stack.push(next);
                    rule_log.push(rule_id);
                }
                Some(Action::Accept) => {
                    rule_log.push(self.grammar.augmenting_rule().id());
                    consumed.push(current);
                    log::debug!(
                        "parse accepted after {} rule application(s)",
                        rule_log.len()
                    );
                    return Ok(replay(self.grammar, &rule_log, &consumed));
                }
                None => {
                    let expected = self.expected_terminals(top);
                    log::warn!(
                        "state {}: syntax error at {}: unexpected {}",
                        top,
                        current.location(),
                        current.symbol()
                    );
                    return Err(DriverError::Syntax {
                        found: current.symbol(),
                        location: current.location().clone(),
                        expected,
                    });
                }
            }
        }
    }

    fn expected_terminals(&self, state: u32) -> Vec<Symbol> {
        self.table
            .row(state)
            .actions
            .keys()
            .map(|&id| {
                if id == symbols::EOF_ID {
                    Symbol::Eof
                } else {
                    Symbol::Terminal(id)
                }
            })
            .collect()
    }
}

/// Reverse-replays `rule_log` (applied in reduction order) to rebuild the
/// derivation top-down and route every input terminal's attribute onto
/// the output positions its rule declared (spec §4.H steps 1-4, P8).
///
/// Applying reduction-order rules in reverse retraces a rightmost
/// derivation: each rule expands the rightmost nonterminal still pending,
/// which is why expansion searches rather than always taking the front.
/// Draining still always happens from the front, since that's where the
/// oldest unconsumed real token belongs once it's no longer blocked by an
/// unexpanded nonterminal to its left.
fn replay(grammar: &Grammar, rule_log: &[u32], consumed: &[Token]) -> Vec<Token> {
    let start = Symbol::NonTerminal(grammar.start());
    let mut input: Pushdown<InputCell> = Pushdown::singleton(InputCell {
        symbol: start,
        targets: Vec::new(),
    });
    let mut output: Pushdown<OutputCell> = Pushdown::singleton(OutputCell::new(start));
    let mut cursor = 0usize;

    for &rule_id in rule_log.iter().rev() {
        let rule = grammar.rule(rule_id);
        expand_rule_rightmost(&mut input, &mut output, rule);

        while matches!(input.front(), Some(cell) if cell.symbol.is_terminal()) {
            let cell = input.pop_front().expect("front just checked terminal");
            let token = &consumed[cursor];
            cursor += 1;
            route_attribute(&mut output, &cell, token);
        }
    }

    output
        .into_vec()
        .into_iter()
        .map(|cell| Token::new(cell.symbol, cell.attribute, cell.location))
        .collect()
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The action/goto table (spec §4.G): one row per state, one action per
//! terminal (including EOF) and one goto per nonterminal, built from a
//! finalized automaton with conflicts resolved by precedence first and a
//! configurable policy second.

use std::collections::BTreeMap;
use std::fmt;

use grammar::{Associativity, Grammar};
use symbols::Symbol;

use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(u32),
    Reduce(u32),
    Accept,
}

/// How strictly a built table tolerates conflicts (spec §4.G, §7.2).
///
/// Both policies resolve what precedence can resolve the same way.
/// `Permissive` only raises a fault for a shift/reduce conflict precedence
/// leaves genuinely unresolved (no declared precedence, or equal level
/// with `none` associativity); `Strict` raises on *any* conflict, even
/// ones precedence settled, so a caller can demand an unambiguous
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Permissive,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    ShiftReduce {
        state: u32,
        terminal: Symbol,
        reduce_rule: u32,
        resolved_by_precedence: bool,
    },
    ReduceReduce {
        state: u32,
        terminal: Symbol,
        chosen_rule: u32,
        shadowed_rule: u32,
    },
}

impl Conflict {
    fn is_fatal(&self, policy: ConflictPolicy) -> bool {
        match (self, policy) {
            (_, ConflictPolicy::Strict) => true,
            (Conflict::ShiftReduce { resolved_by_precedence, .. }, ConflictPolicy::Permissive) => {
                !resolved_by_precedence
            }
            (Conflict::ReduceReduce { .. }, ConflictPolicy::Permissive) => false,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Conflict::ShiftReduce {
                state,
                terminal,
                reduce_rule,
                resolved_by_precedence,
            } => write!(
                f,
                "state {}: shift/reduce conflict on {:?} against reduce by rule {} ({})",
                state,
                terminal,
                reduce_rule,
                if *resolved_by_precedence {
                    "resolved by precedence"
                } else {
                    "no precedence resolves it"
                }
            ),
            Conflict::ReduceReduce {
                state,
                terminal,
                chosen_rule,
                shadowed_rule,
            } => write!(
                f,
                "state {}: reduce/reduce conflict on {:?}, rule {} chosen over rule {}",
                state, terminal, chosen_rule, shadowed_rule
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableError {
    pub conflicts: Vec<Conflict>,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} unresolved conflict(s):", self.conflicts.len())?;
        for conflict in &self.conflicts {
            writeln!(f, "  {}", conflict)?;
        }
        Ok(())
    }
}

impl std::error::Error for TableError {}

#[derive(Debug, Clone)]
pub struct Row {
    pub actions: BTreeMap<u32, Action>,
    pub gotos: BTreeMap<u32, u32>,
}

/// The compact action/goto table, one [`Row`] per automaton state.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    conflicts: Vec<Conflict>,
}

impl Table {
    pub fn build(
        grammar: &Grammar,
        states: &[State],
        policy: ConflictPolicy,
    ) -> Result<Table, TableError> {
        let mut rows = Vec::with_capacity(states.len());
        let mut conflicts = Vec::new();

        for state in states {
            let mut actions: BTreeMap<u32, Action> = BTreeMap::new();
            let mut gotos: BTreeMap<u32, u32> = BTreeMap::new();

            for (&symbol, &target) in &state.transitions {
                match symbol {
                    Symbol::Terminal(id) => {
                        actions.insert(id, Action::Shift(target));
                    }
                    Symbol::NonTerminal(id) => {
                        gotos.insert(id, target);
                    }
                    Symbol::Eof => {}
                }
            }

            // `S' -> S . EOF` never gets shifted into a real successor
            // state (EOF transitions aren't materialized, see
            // `group_successors`): it is the accept signal directly.
            for (key, _) in &state.items {
                if key.rule_id == grammar.augmenting_rule().id()
                    && key.next_symbol(grammar) == Some(Symbol::Eof)
                {
                    actions.insert(Symbol::Eof.terminal_id(), Action::Accept);
                }
            }

            for (_, key, data) in state.reducing_items(grammar) {
                let rule = grammar.rule(key.rule_id);
                if rule.id() == grammar.augmenting_rule().id() {
                    // Unreachable in practice (see above) but guard anyway
                    // so a future change to successor generation can't
                    // silently turn this into a spurious reduce.
                    continue;
                }
                for terminal_id in data.generated.iter_ids() {
                    let terminal = if terminal_id == 0 {
                        Symbol::Eof
                    } else {
                        Symbol::Terminal(terminal_id)
                    };
                    resolve_into(
                        &mut actions,
                        &mut conflicts,
                        grammar,
                        state.id,
                        terminal,
                        rule.id(),
                    );
                }
            }

            rows.push(Row { actions, gotos });
        }

        let fatal: Vec<Conflict> = conflicts
            .iter()
            .filter(|c| c.is_fatal(policy))
            .cloned()
            .collect();
        if !fatal.is_empty() {
            return Err(TableError { conflicts: fatal });
        }
        Ok(Table { rows, conflicts })
    }

    /// Rebuilds a [`Table`] from previously serialized rows (spec §6),
    /// with no conflict diagnostics attached since those belong to the
    /// construction step, not the table itself.
    pub fn from_rows(rows: Vec<Row>) -> Table {
        Table {
            rows,
            conflicts: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, state: u32) -> &Row {
        &self.rows[state as usize]
    }

    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    pub fn action(&self, state: u32, terminal: Symbol) -> Option<Action> {
        self.rows[state as usize]
            .actions
            .get(&terminal.terminal_id())
            .copied()
    }

    pub fn goto(&self, state: u32, non_terminal: u32) -> Option<u32> {
        self.rows[state as usize].gotos.get(&non_terminal).copied()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> TableDisplay<'a> {
        TableDisplay { table: self, grammar }
    }
}

fn resolve_into(
    actions: &mut BTreeMap<u32, Action>,
    conflicts: &mut Vec<Conflict>,
    grammar: &Grammar,
    state_id: u32,
    terminal: Symbol,
    reduce_rule: u32,
) {
    match actions.get(&terminal.terminal_id()).copied() {
        None => {
            actions.insert(terminal.terminal_id(), Action::Reduce(reduce_rule));
        }
        Some(Action::Shift(_)) => {
            let winner = decide_shift_reduce(grammar, terminal, reduce_rule);
            if winner == ShiftReduceWinner::Reduce {
                actions.insert(terminal.terminal_id(), Action::Reduce(reduce_rule));
            }
            conflicts.push(Conflict::ShiftReduce {
                state: state_id,
                terminal,
                reduce_rule,
                resolved_by_precedence: winner != ShiftReduceWinner::Unresolved,
            });
        }
        Some(Action::Reduce(existing_rule)) => {
            // Lowest rule id wins: the earliest-declared alternative, the
            // conventional yacc/bison tie-break.
            let (chosen, shadowed) = if reduce_rule < existing_rule {
                actions.insert(terminal.terminal_id(), Action::Reduce(reduce_rule));
                (reduce_rule, existing_rule)
            } else {
                (existing_rule, reduce_rule)
            };
            conflicts.push(Conflict::ReduceReduce {
                state: state_id,
                terminal,
                chosen_rule: chosen,
                shadowed_rule: shadowed,
            });
        }
        Some(Action::Accept) => {
            // EOF already means accept; a reduce by the augmenting rule
            // itself is handled separately and never reaches here for any
            // other rule sharing EOF in its lookahead.
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftReduceWinner {
    Shift,
    Reduce,
    Unresolved,
}

fn decide_shift_reduce(grammar: &Grammar, terminal: Symbol, reduce_rule: u32) -> ShiftReduceWinner {
    let (shift_assoc, shift_level) = grammar.precedence(terminal);
    let rule = grammar.rule(reduce_rule);
    let rule_level = rule
        .precedence_symbol()
        .map(|sym| grammar.precedence(sym).1)
        .unwrap_or(-1);
    if shift_level < 0 && rule_level < 0 {
        // Neither side declares a precedence: same as equal-level/none,
        // i.e. genuinely unresolved.
        return ShiftReduceWinner::Unresolved;
    }
    match rule_level.cmp(&shift_level) {
        std::cmp::Ordering::Greater => ShiftReduceWinner::Reduce,
        std::cmp::Ordering::Less => ShiftReduceWinner::Shift,
        std::cmp::Ordering::Equal => match shift_assoc {
            Associativity::Left => ShiftReduceWinner::Reduce,
            Associativity::Right => ShiftReduceWinner::Shift,
            Associativity::None => ShiftReduceWinner::Unresolved,
        },
    }
}

pub struct TableDisplay<'a> {
    table: &'a Table,
    grammar: &'a Grammar,
}

impl fmt::Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (state_id, row) in self.table.rows.iter().enumerate() {
            writeln!(f, "state {}", state_id)?;
            for (&terminal_id, action) in &row.actions {
                let terminal = if terminal_id == 0 {
                    Symbol::Eof
                } else {
                    Symbol::Terminal(terminal_id)
                };
                let label = match action {
                    Action::Shift(s) => format!("shift {}", s),
                    Action::Reduce(r) => format!("reduce {}", r),
                    Action::Accept => "accept".to_string(),
                };
                writeln!(f, "  on {}: {}", self.grammar.symbol_name(terminal), label)?;
            }
            for (&nt, &target) in &row.gotos {
                writeln!(
                    f,
                    "  goto {} -> {}",
                    self.grammar.symbol_name(Symbol::NonTerminal(nt)),
                    target
                )?;
            }
        }
        Ok(())
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The augmented translation grammar (spec §3, §4.C).
//!
//! A [`Grammar`] is built once from a set of [`RuleSpec`]s plus a start
//! nonterminal and an optional [`PrecedenceTable`], validated, and then
//! augmented with a fresh `S' -> S $` rule appended as the last rule. It
//! is immutable from then on and shared by read-only reference with every
//! downstream stage (predictive sets, automaton construction, the parse
//! driver).

mod error;
mod precedence;
mod rule;

pub use error::GrammarError;
pub use precedence::{Associativity, PrecedenceLevel, PrecedenceTable};
pub use rule::{Rule, RuleSpec};

use symbols::Symbol;

/// An augmented translation grammar.
///
/// Terminal ids run `1..=terminal_count()`; id `0` is reserved for EOF and
/// is never present in a rule's `input`/`output` as `Symbol::Terminal(0)`
/// — EOF is always `Symbol::Eof`. Nonterminal ids run
/// `0..non_terminal_count()`, with the augmented start symbol occupying
/// the last id.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    start: u32,
    non_terminal_names: Vec<String>,
    terminal_names: Vec<String>,
    precedence: PrecedenceTable,
}

impl Grammar {
    /// Validates `rule_specs`, synthesizes the augmenting rule `S' -> S $`
    /// and appends it last, and assigns stable rule ids in declaration
    /// order.
    pub fn new(
        rule_specs: Vec<RuleSpec>,
        start: u32,
        non_terminal_names: Vec<String>,
        terminal_names: Vec<String>,
        precedence: PrecedenceTable,
    ) -> Result<Grammar, GrammarError> {
        if start as usize >= non_terminal_names.len() {
            return Err(GrammarError::MissingStartNonTerminal);
        }
        let terminal_count = terminal_names.len() as u32;

        let mut rules = Vec::with_capacity(rule_specs.len() + 1);
        for (index, spec) in rule_specs.into_iter().enumerate() {
            rules.push(Rule::from_spec(index as u32, spec)?);
        }

        let augmented_name = fresh_nonterminal_name(&non_terminal_names);
        let mut non_terminal_names = non_terminal_names;
        let augmented_id = non_terminal_names.len() as u32;
        non_terminal_names.push(augmented_name);

        let augmenting_input = vec![Symbol::NonTerminal(start), Symbol::Eof];
        let augmenting_spec = RuleSpec::identity(augmented_id, augmenting_input);
        let augmenting_id = rules.len() as u32;
        rules.push(Rule::from_spec(augmenting_id, augmenting_spec)?);

        log::debug!(
            "grammar built: {} rules, {} nonterminals, {} terminals (augmented start = N{})",
            rules.len(),
            non_terminal_names.len(),
            terminal_count,
            augmented_id
        );

        Ok(Grammar {
            rules,
            start: augmented_id,
            non_terminal_names,
            terminal_names,
            precedence,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: u32) -> &Rule {
        &self.rules[id as usize]
    }

    /// The id of the augmented start nonterminal `S'`.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// The augmenting rule, always last.
    pub fn augmenting_rule(&self) -> &Rule {
        self.rules.last().expect("augmenting rule always present")
    }

    pub fn non_terminal_count(&self) -> u32 {
        self.non_terminal_names.len() as u32
    }

    /// Number of user terminals, excluding EOF.
    pub fn terminal_count(&self) -> u32 {
        self.terminal_names.len() as u32
    }

    pub fn non_terminal_name(&self, id: u32) -> &str {
        &self.non_terminal_names[id as usize]
    }

    pub fn terminal_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Eof => "$",
            Symbol::Terminal(id) => &self.terminal_names[id as usize - 1],
            Symbol::NonTerminal(_) => panic!("terminal_name() called on a nonterminal"),
        }
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::NonTerminal(id) => self.non_terminal_name(id),
            other => self.terminal_name(other),
        }
    }

    /// `(associativity, level)`, or `(None, -1)` if `terminal` has no
    /// declared precedence.
    pub fn precedence(&self, terminal: Symbol) -> (Associativity, i32) {
        self.precedence.lookup(terminal.terminal_id())
    }

    pub fn non_terminal_ids(&self) -> impl Iterator<Item = u32> {
        0..self.non_terminal_count()
    }

    /// Terminal ids including EOF (`0..=terminal_count()`).
    pub fn terminal_ids_with_eof(&self) -> impl Iterator<Item = u32> {
        0..=self.terminal_count()
    }
}

fn fresh_nonterminal_name(existing: &[String]) -> String {
    // The user's start nonterminal is always named; pick a name derived
    // from it if we can find it, otherwise fall back to a generic stem.
    let mut candidate = String::from("Start'");
    while existing.iter().any(|n| n == &candidate) {
        candidate.push('\'');
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(id: u32) -> Symbol {
        Symbol::NonTerminal(id)
    }
    fn t(id: u32) -> Symbol {
        Symbol::Terminal(id)
    }

    #[test]
    fn augments_start_and_appends_last_rule() {
        // S -> a
        let specs = vec![RuleSpec::identity(0, vec![t(1)])];
        let grammar = Grammar::new(
            specs,
            0,
            vec!["S".to_string()],
            vec!["a".to_string()],
            PrecedenceTable::default(),
        )
        .unwrap();

        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.start(), 1);
        let augmenting = grammar.augmenting_rule();
        assert_eq!(augmenting.id(), 1);
        assert_eq!(augmenting.input(), &[nt(0), Symbol::Eof]);
        assert_eq!(augmenting.output(), &[nt(0), Symbol::Eof]);
    }

    #[test]
    fn rejects_mismatched_nonterminal_pairing() {
        // input has A, output doesn't: invalid.
        let bad = RuleSpec::new(0, vec![nt(1)], vec![t(1)], None, None);
        let err = Grammar::new(
            vec![bad],
            0,
            vec!["S".to_string(), "A".to_string()],
            vec!["a".to_string()],
            PrecedenceTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::MismatchedNonTerminals { .. }));
    }

    #[test]
    fn rejects_bad_start() {
        let err = Grammar::new(
            vec![],
            5,
            vec!["S".to_string()],
            vec![],
            PrecedenceTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::MissingStartNonTerminal));
    }
}

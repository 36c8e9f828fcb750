// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::fmt;

/// Grammar-construction errors (spec §7.1): structural violations detected
/// before any parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    MissingStartNonTerminal,
    MismatchedNonTerminals { rule_id: u32 },
    InvalidAttributeTarget { rule_id: u32, target: usize },
    ActionsLengthMismatch {
        rule_id: u32,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarError::MissingStartNonTerminal => {
                write!(f, "start nonterminal is not a valid nonterminal id")
            }
            GrammarError::MismatchedNonTerminals { rule_id } => write!(
                f,
                "rule {}: input and output must contain the same nonterminals in the same order",
                rule_id
            ),
            GrammarError::InvalidAttributeTarget { rule_id, target } => write!(
                f,
                "rule {}: attribute action target {} is not an output terminal",
                rule_id, target
            ),
            GrammarError::ActionsLengthMismatch {
                rule_id,
                expected,
                actual,
            } => write!(
                f,
                "rule {}: expected {} attribute action entries (one per input terminal), found {}",
                rule_id, expected, actual
            ),
        }
    }
}

impl std::error::Error for GrammarError {}

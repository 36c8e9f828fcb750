// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::fmt;

/// Identity of a symbol: a nonterminal, a user terminal, or the
/// distinguished end-of-input terminal.
///
/// Ordering is total and numeric: nonterminals sort before terminals,
/// terminals before `Eof`, matching the `(kind, id)` scheme of spec's
/// data model. A symbol's kind never changes once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    NonTerminal(u32),
    Terminal(u32),
    Eof,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::Eof)
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Symbol::Eof)
    }

    /// The dense terminal id used to index a [`crate::TerminalSet`],
    /// with `Eof` occupying reserved id [`crate::EOF_ID`].
    ///
    /// Panics if called on a nonterminal.
    pub fn terminal_id(&self) -> u32 {
        match self {
            Symbol::Terminal(id) => *id,
            Symbol::Eof => crate::EOF_ID,
            Symbol::NonTerminal(_) => panic!("terminal_id() called on a nonterminal"),
        }
    }

    pub fn non_terminal_id(&self) -> u32 {
        match self {
            Symbol::NonTerminal(id) => *id,
            _ => panic!("non_terminal_id() called on a terminal"),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::NonTerminal(id) => write!(f, "N{}", id),
            Symbol::Terminal(id) => write!(f, "T{}", id),
            Symbol::Eof => write!(f, "$"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_kind_major() {
        assert!(Symbol::NonTerminal(100) < Symbol::Terminal(0));
        assert!(Symbol::Terminal(100) < Symbol::Eof);
        assert!(Symbol::Terminal(1) < Symbol::Terminal(2));
    }

    #[test]
    fn eof_terminal_id_is_reserved() {
        assert_eq!(Symbol::Eof.terminal_id(), crate::EOF_ID);
    }

    #[test]
    #[should_panic]
    fn terminal_id_panics_on_non_terminal() {
        Symbol::NonTerminal(0).terminal_id();
    }
}

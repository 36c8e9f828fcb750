// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Symbol, token and terminal-set primitives.
//!
//! A [`Symbol`] is a tagged small integer identifying a nonterminal, a
//! user terminal or the distinguished end-of-input terminal. [`Token`]
//! pairs a symbol with an opaque attribute and a source [`Location`].
//! [`TerminalSet`] is a fixed-capacity bitset over terminal ids, the
//! representation FIRST/FOLLOW/lookahead sets are built from.

mod location;
mod symbol;
mod terminal_set;
mod token;

pub use location::Location;
pub use symbol::Symbol;
pub use terminal_set::TerminalSet;
pub use token::Token;

/// The id reserved for the end-of-input terminal.
pub const EOF_ID: u32 = 0;

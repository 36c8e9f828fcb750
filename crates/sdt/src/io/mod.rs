// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! External-interface adapters (spec §4.J, §6): the token source and
//! output sink boundaries, plus the stock line-oriented sink and a test
//! double for the source. Serialized-table I/O lives in `automaton` and
//! is simply re-exported from the crate root.

use std::io::Write;

use grammar::Grammar;

use crate::attribute::Token;
use crate::error::DriverError;

/// Synchronous pull-style token supply (spec §6). Implementations own
/// whatever lexical analysis they like; on exhaustion they must keep
/// returning an EOF token rather than panicking, since the driver may
/// peek past the first EOF while backtracking is not a concern for LR but
/// is for the LL driver's nondeterministic variant.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Synchronous consumer of the attributed output stream (spec §6, §7.5).
pub trait OutputSink {
    fn emit(&mut self, token: &Token) -> Result<(), DriverError>;

    fn finish(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

/// A fixed sequence of tokens, for tests: returns an EOF token at the
/// source's own location forever once the sequence is exhausted.
pub struct VecTokenSource {
    tokens: std::vec::IntoIter<Token>,
    eof_location: symbols::Location,
}

impl VecTokenSource {
    pub fn new(tokens: Vec<Token>, eof_location: symbols::Location) -> Self {
        Self {
            tokens: tokens.into_iter(),
            eof_location,
        }
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> Token {
        self.tokens
            .next()
            .unwrap_or_else(|| Token::eof(self.eof_location.clone()))
    }
}

/// The stock sink (spec §6): one line per token, `name[.attribute]`: the
/// attribute is appended only when it carries a printable payload. EOF
/// terminates the stream and is consumed here without being written.
pub struct LineSink<'g, W: Write> {
    grammar: &'g Grammar,
    out: W,
}

impl<'g, W: Write> LineSink<'g, W> {
    pub fn new(grammar: &'g Grammar, out: W) -> Self {
        Self { grammar, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<'g, W: Write> OutputSink for LineSink<'g, W> {
    fn emit(&mut self, token: &Token) -> Result<(), DriverError> {
        if token.symbol().is_eof() {
            return Ok(());
        }
        let name = self.grammar.symbol_name(token.symbol());
        let attribute = token.attribute().to_string();
        let line = if attribute.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, attribute)
        };
        writeln!(self.out, "{}", line).map_err(|e| DriverError::Sink(e.to_string()))
    }
}

/// Collects the emitted tokens in memory, EOF included: useful for
/// asserting the exact attributed stream a seed scenario expects (spec
/// §8), rather than only its stock textual rendering.
#[derive(Debug, Default)]
pub struct VecSink {
    pub tokens: Vec<Token>,
}

impl OutputSink for VecSink {
    fn emit(&mut self, token: &Token) -> Result<(), DriverError> {
        self.tokens.push(token.clone());
        Ok(())
    }
}

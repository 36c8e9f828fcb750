// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Driver-level errors (spec §7.3-§7.5).
//!
//! Grammar-construction and table-construction faults are raised earlier,
//! by `grammar`/`automaton`, and are not re-wrapped here: by the time a
//! driver exists the grammar and table are already frozen and valid. What
//! remains is what can go wrong during a single parse.

use std::fmt;

use symbols::{Location, Symbol};

#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// The table has no shift/reduce/accept action for the current state
    /// and lookahead; the driver halts without recovery (spec §4.H, §7.4).
    Syntax {
        found: Symbol,
        location: Location,
        expected: Vec<Symbol>,
    },
    /// The output sink refused a token or failed to flush (spec §7.5).
    Sink(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriverError::Syntax {
                found,
                location,
                expected,
            } => {
                write!(f, "syntax error at {}: unexpected {}", location, found)?;
                if !expected.is_empty() {
                    write!(f, ", expected one of ")?;
                    for (i, symbol) in expected.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", symbol)?;
                    }
                }
                Ok(())
            }
            DriverError::Sink(message) => write!(f, "output sink error: {}", message),
        }
    }
}

impl std::error::Error for DriverError {}

/// The coarse result code a caller asserts against (spec §7, closing
/// paragraph): `success`, `lexical`, `syntax`, `semantic`, `generation`.
/// The driver itself only ever produces `Syntax`; `Lexical` belongs to the
/// token source and `Semantic`/`Generation` to the output sink, so this is
/// a classification a harness applies on top of [`DriverError`], not
/// something the driver returns directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Lexical,
    Syntax,
    Semantic,
    Generation,
}

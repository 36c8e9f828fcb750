// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The LR parse driver with attributed-translation output, the alternate
//! LL predictive driver, and the external-interface adapters (spec
//! §4.H-§4.J, §6).
//!
//! This is the crate an end user depends on: it re-exports `symbols`,
//! `grammar`, `predict`, and `automaton` so `use sdt::*;` is enough to
//! build a grammar, compute its table, and run a parse.

mod attribute;
mod cell;
mod driver;
mod error;
mod io;
mod ll;
mod pushdown;

pub use attribute::{Attribute, Token};
pub use driver::Driver;
pub use error::{DriverError, Outcome};
pub use io::{LineSink, OutputSink, TokenSource, VecSink, VecTokenSource};
pub use ll::{LlConflict, LlDriver, LlTable, LlTableError, LlVariant};
pub use pushdown::Pushdown;

pub use automaton;
pub use grammar;
pub use predict;
pub use symbols;

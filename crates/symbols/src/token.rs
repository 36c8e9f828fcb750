// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use crate::{Location, Symbol};

/// `(symbol, attribute, location)`. The attribute is opaque to this crate
/// and to the automaton/driver crates downstream of it; `A` is a generic
/// payload parameter rather than a fixed sum type, per spec's design note
/// on attribute type erasure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<A> {
    symbol: Symbol,
    attribute: A,
    location: Location,
}

impl<A> Token<A> {
    pub fn new(symbol: Symbol, attribute: A, location: Location) -> Self {
        Self {
            symbol,
            attribute,
            location,
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn attribute(&self) -> &A {
        &self.attribute
    }

    pub fn into_attribute(self) -> A {
        self.attribute
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_attribute(&mut self, attribute: A) {
        self.attribute = attribute;
    }

    pub fn set_location_if_invalid(&mut self, location: &Location) {
        if !self.location.is_valid() {
            self.location = location.clone();
        }
    }
}

impl<A: Default> Token<A> {
    pub fn eof(location: Location) -> Self {
        Self::new(Symbol::Eof, A::default(), location)
    }
}

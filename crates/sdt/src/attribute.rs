// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The opaque token attribute (spec §9 "attribute type erasure").
//!
//! The core never inspects an attribute's contents, only moves it around;
//! a sum type covering the payload variants a translation actually needs
//! is simpler to work with end to end than a fully generic parameter, so
//! that's what's used here.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    None,
    Integer(i64),
    Float(f64),
    Text(String),
    Char(char),
}

impl Default for Attribute {
    fn default() -> Self {
        Attribute::None
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Attribute::None => Ok(()),
            Attribute::Integer(v) => write!(f, "{}", v),
            Attribute::Float(v) => write!(f, "{}", v),
            Attribute::Text(v) => write!(f, "{}", v),
            Attribute::Char(v) => write!(f, "{}", v),
        }
    }
}

/// A token carrying the grammar's attribute payload.
pub type Token = symbols::Token<Attribute>;

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::fmt;
use std::rc::Rc;

/// A position in a source file.
///
/// `invalid()` is the distinguished value used when attribute routing
/// cannot find a real source location to preserve (spec §3, §4.H P8).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    file: Rc<str>,
    row: u32,
    col: u32,
}

impl Location {
    pub fn new(file: impl Into<Rc<str>>, row: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            row,
            col,
        }
    }

    /// The distinguished "no location" value.
    pub fn invalid() -> Self {
        Self {
            file: Rc::from(""),
            row: 0,
            col: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.row != 0 || self.col != 0 || !self.file.is_empty()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.row, self.col)
        } else {
            write!(f, "{}:{}:{}", self.file, self.row, self.col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_not_valid() {
        assert!(!Location::invalid().is_valid());
        assert!(Location::new("a", 1, 1).is_valid());
    }
}

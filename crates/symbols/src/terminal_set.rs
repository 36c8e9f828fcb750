// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use std::fmt;

use crate::Symbol;

const BITS: u32 = 64;

/// A fixed-capacity bitset over terminal ids (one bit per terminal plus
/// EOF, capacity `T+1` for a grammar with `T` user terminals).
///
/// Capacity is fixed for the life of the set: every operation that takes
/// two sets assumes they share the same capacity (debug-asserted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSet {
    words: Vec<u64>,
    capacity: u32,
}

impl TerminalSet {
    pub fn new(capacity: u32) -> Self {
        let word_count = (capacity as usize).div_ceil(BITS as usize).max(1);
        Self {
            words: vec![0; word_count],
            capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn word_bit(id: u32) -> (usize, u64) {
        ((id / BITS) as usize, 1u64 << (id % BITS))
    }

    pub fn contains_id(&self, id: u32) -> bool {
        debug_assert!(id < self.capacity);
        let (word, bit) = Self::word_bit(id);
        self.words[word] & bit != 0
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.contains_id(symbol.terminal_id())
    }

    pub fn insert_id(&mut self, id: u32) -> bool {
        debug_assert!(id < self.capacity);
        let (word, bit) = Self::word_bit(id);
        let changed = self.words[word] & bit == 0;
        self.words[word] |= bit;
        changed
    }

    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.insert_id(symbol.terminal_id())
    }

    pub fn remove_id(&mut self, id: u32) -> bool {
        debug_assert!(id < self.capacity);
        let (word, bit) = Self::word_bit(id);
        let changed = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        changed
    }

    pub fn remove(&mut self, symbol: Symbol) -> bool {
        self.remove_id(symbol.terminal_id())
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn union_with(&mut self, other: &TerminalSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a |= b;
        }
    }

    /// Unions `other` into `self`, returning whether anything new was
    /// added. Used by the fixed-point computations in `predict`, where
    /// "did it change" drives the worklist.
    pub fn union_report_changed(&mut self, other: &TerminalSet) -> bool {
        debug_assert_eq!(self.capacity, other.capacity);
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let merged = *a | b;
            if merged != *a {
                changed = true;
            }
            *a = merged;
        }
        changed
    }

    pub fn intersect_with(&mut self, other: &TerminalSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a &= b;
        }
    }

    pub fn union(&self, other: &TerminalSet) -> TerminalSet {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    pub fn intersection(&self, other: &TerminalSet) -> TerminalSet {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    pub fn difference(&self, other: &TerminalSet) -> TerminalSet {
        debug_assert_eq!(self.capacity, other.capacity);
        let mut result = self.clone();
        for (a, b) in result.words.iter_mut().zip(other.words.iter()) {
            *a &= !b;
        }
        result
    }

    pub fn is_subset_of(&self, other: &TerminalSet) -> bool {
        debug_assert_eq!(self.capacity, other.capacity);
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// Ids present in the set, in ascending order.
    pub fn iter_ids(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.capacity).filter(move |id| self.contains_id(*id))
    }
}

impl fmt::Display for TerminalSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter_ids().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

/// Associativity of a precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    None,
    Left,
    Right,
}

/// One precedence level: an associativity and the terminal ids it covers.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceLevel {
    pub associativity: Associativity,
    pub terminals: Vec<u32>,
}

impl Default for Associativity {
    fn default() -> Self {
        Associativity::None
    }
}

/// Ordered list of precedence levels; lower index is lower precedence.
/// A terminal with no declared level has precedence `(None, -1)`.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceTable {
    levels: Vec<PrecedenceLevel>,
}

impl PrecedenceTable {
    pub fn new(levels: Vec<PrecedenceLevel>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[PrecedenceLevel] {
        &self.levels
    }

    pub fn lookup(&self, terminal_id: u32) -> (Associativity, i32) {
        for (level_index, level) in self.levels.iter().enumerate() {
            if level.terminals.contains(&terminal_id) {
                return (level.associativity, level_index as i32);
            }
        }
        (Associativity::None, -1)
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! Text serialization of a built [`Table`] (spec §6).
//!
//! Line 1 is the state count. Then, per state in order, one line for its
//! action row (space-separated `terminal_id:op`, `op` one of `S`
//! (success), `sN` (shift to N), `rN` (reduce by rule N)) followed by one
//! line for its goto row (space-separated `nonterminal_id:next_state`).
//! Either row may be empty. The reader tolerates trailing whitespace and
//! blank rows.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::table::{Action, Row, Table};

#[derive(Debug)]
pub enum SerializeError {
    Io(io::Error),
    Malformed { line: usize, text: String },
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SerializeError::Io(e) => write!(f, "i/o error: {}", e),
            SerializeError::Malformed { line, text } => {
                write!(f, "malformed table at line {}: {:?}", line, text)
            }
        }
    }
}

impl std::error::Error for SerializeError {}

impl From<io::Error> for SerializeError {
    fn from(e: io::Error) -> Self {
        SerializeError::Io(e)
    }
}

pub fn write_table(table: &Table, out: &mut dyn Write) -> Result<(), SerializeError> {
    writeln!(out, "{}", table.state_count())?;
    for row in table.rows() {
        let action_row: Vec<String> = row
            .actions
            .iter()
            .map(|(terminal, action)| match action {
                Action::Shift(target) => format!("{}:s{}", terminal, target),
                Action::Reduce(rule) => format!("{}:r{}", terminal, rule),
                Action::Accept => format!("{}:S", terminal),
            })
            .collect();
        writeln!(out, "{}", action_row.join(" "))?;

        let goto_row: Vec<String> = row
            .gotos
            .iter()
            .map(|(nt, target)| format!("{}:{}", nt, target))
            .collect();
        writeln!(out, "{}", goto_row.join(" "))?;
    }
    Ok(())
}

pub fn read_table(input: &mut dyn BufRead) -> Result<Table, SerializeError> {
    let mut lines = input.lines().enumerate();

    let (line_no, header) = next_line(&mut lines)?;
    let state_count: usize = header
        .trim()
        .parse()
        .map_err(|_| malformed(line_no, &header))?;

    let mut rows = Vec::with_capacity(state_count);
    for _ in 0..state_count {
        let (line_no, action_line) = next_line(&mut lines)?;
        let mut actions: BTreeMap<u32, Action> = BTreeMap::new();
        for entry in action_line.split_whitespace() {
            let (terminal, op) = entry
                .split_once(':')
                .ok_or_else(|| malformed(line_no, &action_line))?;
            let terminal: u32 = terminal.parse().map_err(|_| malformed(line_no, &action_line))?;
            let action = parse_action(op).ok_or_else(|| malformed(line_no, &action_line))?;
            actions.insert(terminal, action);
        }

        let (line_no, goto_line) = next_line(&mut lines)?;
        let mut gotos: BTreeMap<u32, u32> = BTreeMap::new();
        for entry in goto_line.split_whitespace() {
            let (nt, target) = entry
                .split_once(':')
                .ok_or_else(|| malformed(line_no, &goto_line))?;
            let nt: u32 = nt.parse().map_err(|_| malformed(line_no, &goto_line))?;
            let target: u32 = target.parse().map_err(|_| malformed(line_no, &goto_line))?;
            gotos.insert(nt, target);
        }

        rows.push(Row { actions, gotos });
    }
    Ok(Table::from_rows(rows))
}

fn parse_action(op: &str) -> Option<Action> {
    if op == "S" {
        return Some(Action::Accept);
    }
    let (tag, rest) = op.split_at(1);
    let arg: u32 = rest.parse().ok()?;
    match tag {
        "s" => Some(Action::Shift(arg)),
        "r" => Some(Action::Reduce(arg)),
        _ => None,
    }
}

fn next_line(
    lines: &mut std::iter::Enumerate<std::io::Lines<&mut dyn BufRead>>,
) -> Result<(usize, String), SerializeError> {
    let (line_no, text) = lines.next().ok_or_else(|| malformed(0, "<eof>"))?;
    Ok((line_no, text?))
}

fn malformed(line: usize, text: &str) -> SerializeError {
    SerializeError::Malformed {
        line,
        text: text.to_string(),
    }
}

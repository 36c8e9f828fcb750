// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! The pushdown element types shared by the LR driver's reverse replay and
//! the LL driver's inline routing, plus their per-rule expansion. Both
//! walk a rule's input/output patterns the same way and build the same
//! `InputCell`/`OutputCell` shapes; they differ only in which pending
//! nonterminal occurrence a rule targets (rightmost for the reverse
//! replay, leftmost for the live top-down walk) — see
//! `expand_rule_rightmost`/`expand_rule_leftmost`.

use grammar::Rule;
use symbols::{Location, Symbol};

use crate::attribute::Attribute;
use crate::pushdown::Pushdown;

#[derive(Debug, Clone)]
pub(crate) struct InputCell {
    pub(crate) symbol: Symbol,
    /// Output-pushdown slot ids this terminal's attribute routes onto.
    /// Empty for nonterminal positions.
    pub(crate) targets: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct OutputCell {
    pub(crate) symbol: Symbol,
    pub(crate) attribute: Attribute,
    pub(crate) location: Location,
}

impl OutputCell {
    pub(crate) fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            attribute: Attribute::default(),
            location: Location::invalid(),
        }
    }
}

/// Builds the input-projection cells for `rule`'s input pattern, wiring
/// each terminal position to the output-projection slot ids its action
/// targets (`output_ids` is the projection's own freshly allocated ids, in
/// the same order as `rule.output()`).
fn input_cells_for(rule: &Rule, output_ids: &[usize]) -> Vec<InputCell> {
    let mut terminal_index = 0usize;
    rule.input()
        .iter()
        .map(|&symbol| {
            if symbol.is_terminal() {
                let targets = rule.actions()[terminal_index]
                    .iter()
                    .map(|&output_position| output_ids[output_position])
                    .collect();
                terminal_index += 1;
                InputCell { symbol, targets }
            } else {
                InputCell {
                    symbol,
                    targets: Vec::new(),
                }
            }
        })
        .collect()
}

/// Expands `rule` on the LR reverse replay (spec §4.H): applying rules in
/// reversed-reduction order retraces a *rightmost* derivation, so the
/// pending nonterminal a given rule expands is the rightmost one still
/// outstanding on each projection, not simply whatever sits at the front.
/// Undrained terminals and not-yet-expanded siblings can both sit ahead of
/// it on either projection.
pub(crate) fn expand_rule_rightmost(
    input: &mut Pushdown<InputCell>,
    output: &mut Pushdown<OutputCell>,
    rule: &Rule,
) {
    let output_ids = output.expand_last_matching(
        |cell| cell.symbol.is_non_terminal(),
        rule.output().iter().map(|&symbol| OutputCell::new(symbol)),
    );
    let input_cells = input_cells_for(rule, &output_ids);
    input.expand_last_matching(|cell| cell.symbol.is_non_terminal(), input_cells);
}

/// Expands `rule` on the LL driver's live top-down walk (spec §4.I): LL is
/// a leftmost derivation, so the input projection's pending nonterminal is
/// always its front. The output projection can still have decoration
/// terminals (from this same rule's own output pattern, or an enclosing
/// one) ahead of the corresponding slot, so it still has to search.
pub(crate) fn expand_rule_leftmost(
    input: &mut Pushdown<InputCell>,
    output: &mut Pushdown<OutputCell>,
    rule: &Rule,
) {
    let output_ids = output.expand_first_matching(
        |cell| cell.symbol.is_non_terminal(),
        rule.output().iter().map(|&symbol| OutputCell::new(symbol)),
    );
    let input_cells = input_cells_for(rule, &output_ids);
    input.expand_front(input_cells);
}

/// Copies `token`'s attribute onto every slot `cell` targets, preserving
/// an already-valid output location (spec P8).
pub(crate) fn route_attribute(
    output: &mut Pushdown<OutputCell>,
    cell: &InputCell,
    token: &crate::attribute::Token,
) {
    for &target in &cell.targets {
        let out_cell = output.get_mut(target);
        out_cell.attribute = token.attribute().clone();
        if !out_cell.location.is_valid() {
            out_cell.location = token.location().clone();
        }
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

use symbols::Symbol;

use crate::error::GrammarError;

/// An unvalidated, unnumbered rule, as supplied to [`crate::Grammar::new`].
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub lhs: u32,
    pub input: Vec<Symbol>,
    pub output: Vec<Symbol>,
    /// `None` means "no attribute routing": filled in as empty target
    /// lists, one per input terminal, at validation time.
    pub actions: Option<Vec<Vec<usize>>>,
    pub precedence_symbol: Option<Symbol>,
}

impl RuleSpec {
    pub fn new(
        lhs: u32,
        input: Vec<Symbol>,
        output: Vec<Symbol>,
        actions: Option<Vec<Vec<usize>>>,
        precedence_symbol: Option<Symbol>,
    ) -> Self {
        Self {
            lhs,
            input,
            output,
            actions,
            precedence_symbol,
        }
    }

    /// A rule whose output is identical to its input, with every input
    /// terminal's attribute implicitly routed to its own (identical)
    /// output position. Grounded in `ctf::TranslationGrammar::Rule`'s
    /// two-argument constructor for non-translating (pure) rules.
    pub fn identity(lhs: u32, both: Vec<Symbol>) -> Self {
        let actions = both
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_terminal())
            .map(|(i, _)| vec![i])
            .collect();
        Self {
            lhs,
            output: both.clone(),
            input: both,
            actions: Some(actions),
            precedence_symbol: None,
        }
    }
}

/// `(lhs, input, output, actions, precedence_symbol, explicit_precedence, id)`.
#[derive(Debug, Clone)]
pub struct Rule {
    id: u32,
    lhs: u32,
    input: Vec<Symbol>,
    output: Vec<Symbol>,
    actions: Vec<Vec<usize>>,
    precedence_symbol: Option<Symbol>,
    explicit_precedence: bool,
}

impl Rule {
    pub(crate) fn from_spec(id: u32, spec: RuleSpec) -> Result<Rule, GrammarError> {
        check_nonterminal_pairing(id, &spec.input, &spec.output)?;

        let input_terminal_count = spec.input.iter().filter(|s| s.is_terminal()).count();
        let actions = match spec.actions {
            Some(actions) => {
                if actions.len() != input_terminal_count {
                    return Err(GrammarError::ActionsLengthMismatch {
                        rule_id: id,
                        expected: input_terminal_count,
                        actual: actions.len(),
                    });
                }
                for target_list in &actions {
                    for &target in target_list {
                        match spec.output.get(target) {
                            Some(sym) if sym.is_terminal() => {}
                            _ => {
                                return Err(GrammarError::InvalidAttributeTarget {
                                    rule_id: id,
                                    target,
                                })
                            }
                        }
                    }
                }
                actions
            }
            None => vec![Vec::new(); input_terminal_count],
        };

        let explicit_precedence = spec.precedence_symbol.is_some();
        let precedence_symbol = spec
            .precedence_symbol
            .or_else(|| spec.input.iter().rev().find(|s| s.is_terminal()).copied());

        Ok(Rule {
            id,
            lhs: spec.lhs,
            input: spec.input,
            output: spec.output,
            actions,
            precedence_symbol,
            explicit_precedence,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn lhs(&self) -> u32 {
        self.lhs
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn output(&self) -> &[Symbol] {
        &self.output
    }

    pub fn actions(&self) -> &[Vec<usize>] {
        &self.actions
    }

    pub fn precedence_symbol(&self) -> Option<Symbol> {
        self.precedence_symbol
    }

    pub fn has_explicit_precedence(&self) -> bool {
        self.explicit_precedence
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }
}

fn check_nonterminal_pairing(
    rule_id: u32,
    input: &[Symbol],
    output: &[Symbol],
) -> Result<(), GrammarError> {
    let input_nts: Vec<Symbol> = input.iter().copied().filter(|s| s.is_non_terminal()).collect();
    let output_nts: Vec<Symbol> = output.iter().copied().filter(|s| s.is_non_terminal()).collect();
    if input_nts == output_nts {
        Ok(())
    } else {
        Err(GrammarError::MismatchedNonTerminals { rule_id })
    }
}

// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>

//! End-to-end scenarios straight out of the driver's acceptance examples
//! (spec §8): a parse from source tokens through to the attributed output
//! stream, covering the empty language, nested-bracket attribute routing,
//! the LALR/canonical-LR split, and precedence-driven infix-to-postfix
//! translation.

use automaton::{ConflictPolicy, LrVariant};
use grammar::{Associativity, Grammar, PrecedenceLevel, PrecedenceTable, RuleSpec};
use predict::PredictiveSets;
use sdt::{Attribute, Driver, DriverError, LlDriver, LlTable, LlVariant, Token};
use symbols::{Location, Symbol};

fn nt(id: u32) -> Symbol {
    Symbol::NonTerminal(id)
}
fn t(id: u32) -> Symbol {
    Symbol::Terminal(id)
}

fn loc(row: u32, col: u32) -> Location {
    Location::new("seed", row, col)
}

fn plain_tokens(symbols: &[Symbol]) -> Vec<Token> {
    symbols
        .iter()
        .enumerate()
        .map(|(i, &s)| Token::new(s, Attribute::None, loc(1, i as u32 + 1)))
        .collect()
}

#[test]
fn empty_language_emits_only_eof() {
    // S -> ε
    let grammar = Grammar::new(
        vec![RuleSpec::identity(0, vec![])],
        0,
        vec!["S".into()],
        vec![],
        PrecedenceTable::default(),
    )
    .unwrap();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let at = loc(1, 1);
    let mut source = sdt::VecTokenSource::new(vec![], at.clone());
    let output = driver.parse(&mut source).unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].symbol(), Symbol::Eof);
    assert_eq!(output[0].location(), &at);
}

/// S -> S o A | A ; A -> i | ( S ), with the output side tagging each
/// production (`1`/`2`/`3`/`4`) instead of reproducing its input symbols,
/// and the opening paren's attribute routed onto its production's tag.
fn nested_parens_grammar() -> Grammar {
    let i = t(1);
    let o = t(2);
    let lparen = t(3);
    let rparen = t(4);
    let tag1 = t(5);
    let tag2 = t(6);
    let tag3 = t(7);
    let tag4 = t(8);

    let specs = vec![
        // S -> S o A    (output: tag1 S A)
        RuleSpec::new(0, vec![nt(0), o, nt(1)], vec![tag1, nt(0), nt(1)], Some(vec![vec![]]), None),
        // S -> A        (output: tag2 A)
        RuleSpec::new(0, vec![nt(1)], vec![tag2, nt(1)], Some(vec![]), None),
        // A -> i        (output: tag3), i's attribute routes onto the tag
        RuleSpec::new(1, vec![i], vec![tag3], Some(vec![vec![0]]), None),
        // A -> ( S )    (output: tag4 S), '(' routes onto the tag, ')' onto nothing
        RuleSpec::new(
            1,
            vec![lparen, nt(0), rparen],
            vec![tag4, nt(0)],
            Some(vec![vec![0], vec![]]),
            None,
        ),
    ];
    Grammar::new(
        specs,
        0,
        vec!["S".into(), "A".into()],
        vec!["i".into(), "o".into(), "(".into(), ")".into(), "1".into(), "2".into(), "3".into(), "4".into()],
        PrecedenceTable::default(),
    )
    .unwrap()
}

#[test]
fn nested_parens_routes_attributes_through_tagged_output() {
    let grammar = nested_parens_grammar();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    // "( i o ( i o i ) )" — the two '(' tokens carry distinguishable
    // attributes so routing order can be checked, not just symbol order.
    let tokens = vec![
        Token::new(t(3), Attribute::Integer(100), loc(1, 1)), // outer '('
        Token::new(t(1), Attribute::None, loc(1, 2)),
        Token::new(t(2), Attribute::None, loc(1, 3)),
        Token::new(t(3), Attribute::Integer(200), loc(1, 4)), // inner '('
        Token::new(t(1), Attribute::None, loc(1, 5)),
        Token::new(t(2), Attribute::None, loc(1, 6)),
        Token::new(t(1), Attribute::None, loc(1, 7)),
        Token::new(t(4), Attribute::None, loc(1, 8)),
        Token::new(t(4), Attribute::None, loc(1, 9)),
    ];
    let mut source = sdt::VecTokenSource::new(tokens, loc(1, 10));
    let output = driver.parse(&mut source).unwrap();

    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();
    assert_eq!(
        symbols,
        vec![t(6), t(8), t(5), t(6), t(7), t(8), t(5), t(6), t(7), t(7), Symbol::Eof]
    );

    // tag4 at index 1 is the outer "( S )"; tag4 at index 5 is the inner one.
    assert_eq!(output[1].attribute(), &Attribute::Integer(100));
    assert_eq!(output[5].attribute(), &Attribute::Integer(200));
}

/// S -> A a | b A c | d c | b d a ; A -> d — the textbook case where a
/// merged LALR state loses the lookahead distinction SLR's FOLLOW-set
/// approximation needs, but the canonical split isn't actually required.
fn lalr_only_grammar() -> Grammar {
    let a = t(1);
    let b = t(2);
    let c = t(3);
    let d = t(4);
    let specs = vec![
        RuleSpec::identity(0, vec![nt(1), a]),
        RuleSpec::identity(0, vec![b, nt(1), c]),
        RuleSpec::identity(0, vec![d, c]),
        RuleSpec::identity(0, vec![b, d, a]),
        RuleSpec::identity(1, vec![d]),
    ];
    Grammar::new(
        specs,
        0,
        vec!["S".into(), "A".into()],
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        PrecedenceTable::default(),
    )
    .unwrap()
}

#[test]
fn lalr_accepts_where_slr_reports_a_conflict() {
    let grammar = lalr_only_grammar();
    let predict = PredictiveSets::compute(&grammar);

    let slr = automaton::build(&grammar, &predict, LrVariant::Slr);
    let slr_table = automaton::build_table(&grammar, &slr, ConflictPolicy::Strict);
    assert!(slr_table.is_err(), "SLR's FOLLOW-set lookahead should conflict on this grammar");

    let lalr = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &lalr, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let mut source = sdt::VecTokenSource::new(plain_tokens(&[d, c]), loc(1, 3));
    let output = driver.parse(&mut source).unwrap();
    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();
    assert_eq!(symbols, vec![d, c, Symbol::Eof]);
}

/// S -> a E a | b E b | a F b | b F a ; E -> e ; F -> e — LALR's core
/// merge collapses `E -> e .` and `F -> e .` into one state with
/// incompatible lookaheads; only the canonical split keeps them apart.
fn canonical_only_grammar() -> Grammar {
    let a = t(1);
    let b = t(2);
    let e = t(3);
    let specs = vec![
        RuleSpec::identity(0, vec![a, nt(1), a]),
        RuleSpec::identity(0, vec![b, nt(1), b]),
        RuleSpec::identity(0, vec![a, nt(2), b]),
        RuleSpec::identity(0, vec![b, nt(2), a]),
        RuleSpec::identity(1, vec![e]),
        RuleSpec::identity(2, vec![e]),
    ];
    Grammar::new(
        specs,
        0,
        vec!["S".into(), "E".into(), "F".into()],
        vec!["a".into(), "b".into(), "e".into()],
        PrecedenceTable::default(),
    )
    .unwrap()
}

#[test]
fn canonical_lr_accepts_where_lalr_conflicts() {
    let grammar = canonical_only_grammar();
    let predict = PredictiveSets::compute(&grammar);

    let lalr = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let lalr_table = automaton::build_table(&grammar, &lalr, ConflictPolicy::Strict);
    assert!(lalr_table.is_err(), "LALR's merged core should conflict on this grammar");

    let canonical = automaton::build(&grammar, &predict, LrVariant::CanonicalLr1);
    let table = automaton::build_table(&grammar, &canonical, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let a = t(1);
    let e = t(3);
    let b = t(2);
    let mut source = sdt::VecTokenSource::new(plain_tokens(&[a, e, b]), loc(1, 4));
    let output = driver.parse(&mut source).unwrap();
    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();
    assert_eq!(symbols, vec![a, e, b, Symbol::Eof]);
}

#[test]
fn lscelr_accepts_where_lalr_conflicts() {
    let grammar = canonical_only_grammar();
    let predict = PredictiveSets::compute(&grammar);

    let lscelr = automaton::build(&grammar, &predict, LrVariant::Lscelr);
    let table = automaton::build_table(&grammar, &lscelr, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let a = t(1);
    let e = t(3);
    let b = t(2);
    let mut source = sdt::VecTokenSource::new(plain_tokens(&[a, e, b]), loc(1, 4));
    let output = driver.parse(&mut source).unwrap();
    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();
    assert_eq!(symbols, vec![a, e, b, Symbol::Eof]);
}

/// E -> E + E | n, genuinely ambiguous with no precedence declared: every
/// policy must reject it, and the fault must name the conflicted state.
fn ambiguous_grammar() -> Grammar {
    let specs = vec![
        RuleSpec::identity(0, vec![nt(0), t(1), nt(0)]),
        RuleSpec::identity(0, vec![t(2)]),
    ];
    Grammar::new(
        specs,
        0,
        vec!["E".into()],
        vec!["+".into(), "n".into()],
        PrecedenceTable::default(),
    )
    .unwrap()
}

#[test]
fn undeclared_ambiguity_is_fatal_under_every_policy() {
    let grammar = ambiguous_grammar();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);

    let strict = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict).unwrap_err();
    assert!(!strict.conflicts.is_empty());
    assert!(matches!(
        strict.conflicts[0],
        automaton::Conflict::ShiftReduce { .. }
    ));

    let permissive =
        automaton::build_table(&grammar, &automaton, ConflictPolicy::Permissive).unwrap_err();
    assert!(!permissive.conflicts.is_empty());
}

/// Expr -> i | Expr (+|-|*|/|^) Expr | -Expr | (Expr), four precedence
/// levels ascending `{+ -} < {* /} < {unary -} < {^}` (`^` right-assoc,
/// everything else but unary left-assoc). The unary rule carries an
/// explicit precedence override onto a pseudo-terminal that never appears
/// in a real token stream — the classic `%prec UMINUS` trick — and tags
/// its own output token distinctly from binary `-` so the postfix stream
/// can tell them apart.
fn expression_grammar() -> Grammar {
    let plus = t(1);
    let minus = t(2);
    let star = t(3);
    let slash = t(4);
    let caret = t(5);
    let lparen = t(6);
    let rparen = t(7);
    let i = t(8);
    let uminus = t(9);

    let specs = vec![
        RuleSpec::identity(0, vec![i]),                       // 0: Expr -> i
        RuleSpec::identity(0, vec![nt(0), plus, nt(0)]),       // 1: Expr -> Expr + Expr
        RuleSpec::identity(0, vec![nt(0), minus, nt(0)]),      // 2: Expr -> Expr - Expr
        RuleSpec::identity(0, vec![nt(0), star, nt(0)]),       // 3: Expr -> Expr * Expr
        RuleSpec::identity(0, vec![nt(0), slash, nt(0)]),      // 4: Expr -> Expr / Expr
        RuleSpec::new(
            0,
            vec![minus, nt(0)],
            vec![uminus, nt(0)],
            Some(vec![vec![0]]),
            Some(uminus),
        ), // 5: Expr -> - Expr, tagged `uminus` in output and precedence
        RuleSpec::identity(0, vec![nt(0), caret, nt(0)]),      // 6: Expr -> Expr ^ Expr
        RuleSpec::new(0, vec![lparen, nt(0), rparen], vec![nt(0)], Some(vec![vec![], vec![]]), None), // 7: Expr -> ( Expr )
    ];

    let precedence = PrecedenceTable::new(vec![
        PrecedenceLevel {
            associativity: Associativity::Left,
            terminals: vec![1, 2],
        },
        PrecedenceLevel {
            associativity: Associativity::Left,
            terminals: vec![3, 4],
        },
        PrecedenceLevel {
            associativity: Associativity::None,
            terminals: vec![9],
        },
        PrecedenceLevel {
            associativity: Associativity::Right,
            terminals: vec![5],
        },
    ]);

    Grammar::new(
        specs,
        0,
        vec!["Expr".into()],
        vec![
            "+".into(),
            "-".into(),
            "*".into(),
            "/".into(),
            "^".into(),
            "(".into(),
            ")".into(),
            "i".into(),
            "uminus".into(),
        ],
        precedence,
    )
    .unwrap()
}

#[test]
fn expression_precedence_resolves_without_conflicts() {
    let grammar = expression_grammar();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict);
    assert!(
        table.is_ok(),
        "the declared precedence levels should resolve every shift/reduce choice"
    );
}

#[test]
fn expression_precedence_translates_infix_to_postfix() {
    let grammar = expression_grammar();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let plus = t(1);
    let minus = t(2);
    let star = t(3);
    let slash = t(4);
    let caret = t(5);
    let lparen = t(6);
    let rparen = t(7);
    let i = t(8);
    let uminus = t(9);

    // i ^ - i ^ ( i - i * - i / i ) + i
    let input = [
        i, caret, minus, i, caret, lparen, i, minus, i, star, minus, i, slash, i, rparen, plus, i,
    ];
    let mut source = sdt::VecTokenSource::new(plain_tokens(&input), loc(1, input.len() as u32 + 1));
    let output = driver.parse(&mut source).unwrap();
    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();

    let expected = vec![
        i, i, uminus, i, i, i, uminus, star, i, slash, minus, caret, caret, i, plus, Symbol::Eof,
    ];
    assert_eq!(symbols, expected);
}

/// S -> ( S ) | i — plain LL(1) recursion-by-nesting, no left recursion,
/// predict sets disjoint on the very first token.
fn ll_parens_grammar() -> Grammar {
    let lparen = t(1);
    let rparen = t(2);
    let i = t(3);
    let specs = vec![
        RuleSpec::identity(0, vec![lparen, nt(0), rparen]),
        RuleSpec::identity(0, vec![i]),
    ];
    Grammar::new(
        specs,
        0,
        vec!["S".into()],
        vec!["(".into(), ")".into(), "i".into()],
        PrecedenceTable::default(),
    )
    .unwrap()
}

#[test]
fn ll_driver_accepts_a_unique_ll1_grammar() {
    let grammar = ll_parens_grammar();
    let predict = PredictiveSets::compute(&grammar);
    let table = LlTable::build(&grammar, &predict, LlVariant::Unique).unwrap();
    let driver = LlDriver::new(&grammar, &table);

    let lparen = t(1);
    let rparen = t(2);
    let i = t(3);
    let mut tokens = plain_tokens(&[lparen, lparen, i, rparen, rparen]);
    tokens.push(Token::new(Symbol::Eof, Attribute::None, loc(1, 6)));

    let output = driver.parse(&tokens).unwrap();
    let symbols: Vec<Symbol> = output.iter().map(|tok| tok.symbol()).collect();
    assert_eq!(symbols, vec![lparen, lparen, i, rparen, rparen, Symbol::Eof]);
}

#[test]
fn syntax_error_reports_the_found_token_and_location() {
    // S -> a
    let grammar = Grammar::new(
        vec![RuleSpec::identity(0, vec![t(1)])],
        0,
        vec!["S".into()],
        vec!["a".into()],
        PrecedenceTable::default(),
    )
    .unwrap();
    let predict = PredictiveSets::compute(&grammar);
    let automaton = automaton::build(&grammar, &predict, LrVariant::Lalr);
    let table = automaton::build_table(&grammar, &automaton, ConflictPolicy::Strict).unwrap();
    let driver = Driver::new(&grammar, &table);

    let at = loc(2, 5);
    let bad = Token::new(Symbol::Eof, Attribute::None, at.clone());
    let mut source = sdt::VecTokenSource::new(vec![bad], at.clone());
    let err = driver.parse(&mut source).unwrap_err();
    match err {
        DriverError::Syntax { found, location, .. } => {
            assert_eq!(found, Symbol::Eof);
            assert_eq!(location, at);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

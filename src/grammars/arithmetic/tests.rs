use super::{Arith, ENTRY, GRAMMAR};
use crate::{Options, ParseError, parse, parse_with};

#[test]
fn arithmetic_examples_matching() {
    // Array of (expected tree, input)
    let cases: Vec<(&str, &str)> = vec![
        (r#"Number("42")"#, "42"),
        (r#"Number("3.25")"#, " 3.25 "),
        (r#"Add(Number("1"), Number("2"))"#, "1+2"),
        (r#"Add(Number("1"), Number("2"), Number("3"))"#, "1 + 2 + 3"),
        (r#"Sub(Number("10"), Number("4"))"#, "10-4"),
        (r#"Mul(Number("2"), Div(Number("8"), Number("4")))"#, "2 * 8 / 4"),
        (r#"Mul(Add(Number("1"), Number("2")), Number("3"))"#, "(1 + 2) * 3"),
        (r#"Neg(Number("5"))"#, "-5"),
        (r#"Sub(Number("1"), Neg(Number("5")))"#, "1 - -5"),
        (r#"Number("7")"#, "((7))"),
        (
            r#"Add(Number("42"), Sub(Number("11"), Mul(Number("1"), Div(Number("20"), Number("10"))), Number("14")))"#,
            "42 + 11 - 1*20/10-14",
        ),
    ];

    for (expected, input) in cases {
        let tree = parse(&GRAMMAR, ENTRY, input).unwrap_or_else(|err| panic!("'{input}' failed to parse: {err}"));
        assert_eq!(tree.to_string(), expected, "input '{input}'");
    }
}

#[test]
fn arithmetic_examples_failing() {
    let cases = ["", "+", "1 +", "(1 + 2", "1 2", "1 + * 2"];

    for input in cases {
        assert!(parse(&GRAMMAR, ENTRY, input).is_err(), "'{input}' should not parse");
    }
}

#[test]
fn dangling_operator_is_trailing_input() {
    let err = parse(&GRAMMAR, ENTRY, "42 +").unwrap_err();
    let ParseError::TrailingInput { at, snippet } = err else {
        panic!("expected trailing input, got {err:?}");
    };
    assert_eq!(at.offset, 3);
    assert_eq!(snippet, "+");
}

#[test]
fn grammar_is_clean() {
    assert!(GRAMMAR.issues().is_empty(), "{:?}", GRAMMAR.issues());
}

#[test]
fn memoization_does_not_change_the_tree() {
    let input = "(1 + 2) * (3 - 4) / 5 + 6";
    let memo = parse(&GRAMMAR, ENTRY, input).unwrap();
    let plain = parse_with(&GRAMMAR, ENTRY, input, &Options::default().without_memo()).unwrap();
    assert_eq!(memo, plain);
    assert_eq!(memo.walk().filter(|n| n.tag() == Some(Arith::Number)).count(), 6);
}

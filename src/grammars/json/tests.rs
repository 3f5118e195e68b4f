use super::{ENTRY, GRAMMAR, Json};
use crate::{ParseError, parse};

#[test]
fn json_examples_matching() {
    // Array of (expected tree, input)
    let cases: Vec<(&str, &str)> = vec![
        ("Null", "null"),
        ("True", " true "),
        (r#"Number("-1.5e3")"#, "-1.5e3"),
        (r#"String("")"#, r#""""#),
        (r#"String("a \\\"b\\\"")"#, r#""a \"b\"""#),
        ("Object", "{}"),
        ("Array", "[ ]"),
        (r#"Array(Number("1"), Number("2"), Null)"#, "[1, 2, null]"),
        (r#"Array(Array(Array))"#, "[[[]]]"),
        (
            r#"Object(Property(String("name"), String("Fred")), Property(String("age"), Number("20")))"#,
            r#"{"name": "Fred", "age": 20}"#,
        ),
        (
            r#"Object(Property(String("tags"), Array(String("a"), False)), Property(String("o"), Object))"#,
            "{\n  \"tags\": [\"a\", false],\n  \"o\": {}\n}\n",
        ),
    ];

    for (expected, input) in cases {
        let tree = parse(&GRAMMAR, ENTRY, input).unwrap_or_else(|err| panic!("'{input}' failed to parse: {err}"));
        assert_eq!(tree.to_string(), expected, "input '{input}'");
    }
}

#[test]
fn json_examples_failing() {
    let cases = ["", "{", "[1,]", r#"{"a" 1}"#, r#"{"a": 1,}"#, "nullx", "01", r#""open"#];

    for input in cases {
        assert!(parse(&GRAMMAR, ENTRY, input).is_err(), "'{input}' should not parse");
    }
}

#[test]
fn no_match_points_at_furthest_progress() {
    let err = parse(&GRAMMAR, ENTRY, "{\n  \"a\": [1, 2,\n  ]\n}").unwrap_err();
    let ParseError::NoMatch { furthest, .. } = err else {
        panic!("expected no match, got {err:?}");
    };
    assert_eq!((furthest.line, furthest.column), (2, 14));
}

#[test]
fn properties_are_walkable_by_tag() {
    let tree = parse(&GRAMMAR, ENTRY, r#"{"a": {"b": 1}, "c": [2]}"#).unwrap();
    let keys: Vec<_> = tree
        .walk()
        .filter(|n| n.tag() == Some(Json::Property))
        .filter_map(|p| p.child(0).and_then(|k| k.text()))
        .collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn grammar_is_clean() {
    assert!(GRAMMAR.issues().is_empty(), "{:?}", GRAMMAR.issues());
}

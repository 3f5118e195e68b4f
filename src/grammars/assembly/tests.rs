use super::{Asm, ENTRY, GRAMMAR};
use crate::{ParseError, parse};

#[test]
fn assembly_examples_matching() {
    // Array of (expected tree, input)
    let cases: Vec<(&str, &str)> = vec![
        (r#"Program(Assign(Accumulator("1"), Number("6")))"#, "a_1 := 6"),
        (r#"Program(Assign(Register("0"), Mul(Accumulator("1"), Register("0"))))"#, "r_0 := a_1 * r_0"),
        (r#"Program(Assign(Address("12"), Sub(Number("-3"), Number("4"))))"#, "@12 := -3 - 4"),
        (r#"Program(Push(Accumulator("2")), Pop(Register("1")))"#, "push a_2\npop r_1"),
        (r#"Program(Branch(Greater(Accumulator("1"), Number("1")), Label("fac")))"#, "if a_1 > 1 goto fac"),
        (r#"Program(Branch(LessEqual(Register("0"), Address("3")), Label("done")))"#, "if r_0 <= @3 goto done"),
        (r#"Program(Goto(Label("ending")))"#, "goto ending"),
        (r#"Program(End)"#, "goto   end"),
        (r#"Program(Return)"#, "\n\nreturn\n"),
        (r#"Program(Labeled(Assign(Accumulator("0"), Number("1")), Label("fac")))"#, "a_0 := 1 : fac"),
        (
            r#"Program(Assign(Accumulator("1"), Number("6")), Call(Label("fac")), End)"#,
            "a_1 := 6\ncall fac\ngoto end",
        ),
        (
            r#"Program(Assign(Accumulator("1"), Number("6")), Return)"#,
            "# setup\na_1 := 6   # six\n\n\t# nothing here\nreturn",
        ),
    ];

    for (expected, input) in cases {
        let tree = parse(&GRAMMAR, ENTRY, input).unwrap_or_else(|err| panic!("{input:?} failed to parse: {err}"));
        assert_eq!(tree.to_string(), expected, "input {input:?}");
    }
}

#[test]
fn assembly_examples_failing() {
    let cases = ["", "a_1 = 6", "a_1 := ", "call", "push a_1 pop a_2", "goto end now", "if a_1 goto x", "6 := a_1"];

    for input in cases {
        assert!(parse(&GRAMMAR, ENTRY, input).is_err(), "{input:?} should not parse");
    }
}

#[test]
fn assignment_target_is_first_child() {
    let tree = parse(&GRAMMAR, ENTRY, "a_1 := 6\ncall fac\ngoto end").unwrap();
    let lines: Vec<_> = tree.children().iter().map(|line| line.tag()).collect();
    assert_eq!(lines, [Some(Asm::Assign), Some(Asm::Call), Some(Asm::End)]);

    let target = tree.child(0).and_then(|assign| assign.child(0)).unwrap();
    assert_eq!(target.tag(), Some(Asm::Accumulator));
    assert_eq!(target.text(), Some("1"));
}

#[test]
fn error_reports_line_and_column() {
    let err = parse(&GRAMMAR, ENTRY, "a_1 := 6\ncall fac\npush\n").unwrap_err();
    let ParseError::TrailingInput { at, .. } = err else {
        panic!("expected trailing input, got {err:?}");
    };
    assert_eq!((at.line, at.column), (3, 1));
}

#[test]
fn long_programs_parse_on_a_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let program = (0..5_000).map(|i| format!("a_{i} := r_{i} + {i}")).collect::<Vec<_>>().join("\n");
            parse(&GRAMMAR, ENTRY, &program).map(|tree| tree.children().len())
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), Ok(5_000));
}

#[test]
fn grammar_is_clean() {
    assert!(GRAMMAR.issues().is_empty(), "{:?}", GRAMMAR.issues());
}

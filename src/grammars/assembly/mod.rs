//! A small line-oriented assembly notation.
//!
//! ```text
//! a_1 := 6            # accumulator 1 gets 6
//! r_0 := a_1 * r_0
//! push a_1
//! if a_1 > 1 goto fac : loop
//! call fac
//! goto end
//! ```
//!
//! One statement per line, optionally followed by `: label`. Spaces, tabs
//! and `#` comments are ignorable; newlines are not. The tree is only parsed
//! here, never executed.

use crate::grammar::{GrammarBuilder, ParserPool};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asm {
    Program,
    Labeled,
    Label,
    Assign,
    Call,
    Goto,
    End,
    Branch,
    Push,
    Pop,
    Return,
    Accumulator,
    Register,
    Address,
    Number,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
}

/// Entry rule.
pub const ENTRY: &str = "program";

const LABEL: &str = r"[A-Za-z_][A-Za-z0-9_]*";

pub static GRAMMAR: Lazy<ParserPool<Asm>> = Lazy::new(|| builder().build());

/// `name ::= operand op operand => tag | ...`, optionally `| operand`.
fn binary(g: &mut GrammarBuilder<Asm>, name: &str, ops: &[(&str, Asm)], fallback: bool) {
    let mut rule = g.rule(name);
    for (idx, &(op, tag)) in ops.iter().enumerate() {
        if idx > 0 {
            rule = rule.or();
        }
        rule = rule.call("operand").hide(op).call("operand").tag(tag);
    }
    if fallback {
        rule = rule.or().call("operand");
    }
    rule.end();
}

pub fn builder() -> GrammarBuilder<Asm> {
    let mut g = GrammarBuilder::new();
    g.ignore(r"[ \t]+").ignore(r"#[^\n]*");

    g.rule("program")
        .maybe("newlines")
        .call("line")
        .many("next_line")
        .maybe("newlines")
        .tag(Asm::Program)
        .end();
    g.rule("next_line").call("newlines").call("line").end();
    g.rule("newlines").some("newline").end();
    g.rule("newline").hide(r"\r?\n").end();

    g.rule("line")
        .call("statement")
        .hide(":")
        .capture(LABEL, Asm::Label)
        .tag(Asm::Labeled)
        .or()
        .call("statement")
        .end();
    g.rule("statement")
        .any_of(&["assign", "call", "end", "goto", "branch", "push", "pop", "return"])
        .end();

    g.rule("assign").call("target").hide(":=").call("expr").tag(Asm::Assign).end();
    g.rule("call").hide(r"call\b").capture(LABEL, Asm::Label).tag(Asm::Call).end();
    g.rule("end").hide(r"goto[ \t]+end\b").tag(Asm::End).end();
    g.rule("goto").hide(r"goto\b").capture(LABEL, Asm::Label).tag(Asm::Goto).end();
    g.rule("branch")
        .hide(r"if\b")
        .call("condition")
        .hide(r"goto\b")
        .capture(LABEL, Asm::Label)
        .tag(Asm::Branch)
        .end();
    g.rule("push").hide(r"push\b").call("expr").tag(Asm::Push).end();
    g.rule("pop").hide(r"pop\b").call("target").tag(Asm::Pop).end();
    g.rule("return").keyword(r"return\b", Asm::Return).end();

    binary(
        &mut g,
        "expr",
        &[(r"\+", Asm::Add), ("-", Asm::Sub), (r"\*", Asm::Mul), ("/", Asm::Div), ("%", Asm::Mod)],
        true,
    );
    binary(
        &mut g,
        "condition",
        &[
            ("==", Asm::Equal),
            ("!=", Asm::NotEqual),
            ("<=", Asm::LessEqual),
            (">=", Asm::GreaterEqual),
            ("<", Asm::Less),
            (">", Asm::Greater),
        ],
        false,
    );

    g.rule("target").any_of(&["accumulator", "register", "address"]).end();
    g.rule("operand").any_of(&["accumulator", "register", "address", "number"]).end();
    g.rule("accumulator").capture(r"a_(\d+)", Asm::Accumulator).end();
    g.rule("register").capture(r"r_(\d+)", Asm::Register).end();
    g.rule("address").capture(r"@(\d+)", Asm::Address).end();
    g.rule("number").capture(r"-?\d+", Asm::Number).end();
    g
}

#[cfg(test)]
mod tests;

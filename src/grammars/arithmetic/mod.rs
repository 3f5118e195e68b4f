//! Arithmetic expressions.
//!
//! Precedence, lowest first: `+`, `-`, `*`, `/`. Each level is a list
//! (`Add(a, b, c)`), not a binary chain, so `1 - 2 - 3` is `Sub(1, 2, 3)`.
//!
//! ```text
//! sum      ::= diff sum_tail+    => Add  | diff
//! sum_tail ::= "+" diff
//! diff     ::= prod diff_tail+   => Sub  | prod
//! prod     ::= quot prod_tail+   => Mul  | quot
//! quot     ::= atom quot_tail+   => Div  | atom
//! atom     ::= number | "(" sum ")" | "-" atom => Neg
//! ```

use crate::grammar::{GrammarBuilder, ParserPool};
use crate::Assembly;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arith {
    Number,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
}

/// Entry rule.
pub const ENTRY: &str = "sum";

pub static GRAMMAR: Lazy<ParserPool<Arith>> = Lazy::new(|| builder().build());

/// One precedence level: `name ::= next (op next)+ => tag | next`.
fn level(g: &mut GrammarBuilder<Arith>, name: &str, op: &str, next: &str, tag: Arith) {
    let tail = format!("{name}_tail");
    g.rule(name).call(next).some(&tail).tag(tag).or().call(next).end();
    g.rule(&tail).hide(op).call(next).end();
}

pub fn builder() -> GrammarBuilder<Arith> {
    let mut g = GrammarBuilder::new();
    g.ignore(r"\s+");
    level(&mut g, "sum", r"\+", "diff", Arith::Add);
    level(&mut g, "diff", "-", "prod", Arith::Sub);
    level(&mut g, "prod", r"\*", "quot", Arith::Mul);
    level(&mut g, "quot", "/", "atom", Arith::Div);
    g.rule("atom")
        .capture(r"\d+(?:\.\d+)?", Arith::Number)
        .or()
        .hide(r"\(")
        .call("sum")
        .hide(r"\)")
        .assemble(Assembly::First)
        .or()
        .hide("-")
        .call("atom")
        .tag(Arith::Neg)
        .end();
    g
}

#[cfg(test)]
mod tests;

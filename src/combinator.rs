//! Parser variants.
//!
//! Parsers live in an arena owned by a [`ParserPool`](crate::grammar::ParserPool)
//! and refer to each other by [`ParserId`]. Named references point at a
//! [`RuleId`] and are filled in once every rule of the grammar is known, so
//! self- and mutually-recursive rules need no forward declarations.
//!
//! ```text
//! sum ──► Alternative ─┬─► Sequence [Reference(diff), Repeat(Reference(sum_tail))]
//!                      └─► Sequence [Reference(diff)]
//! ```

use crate::assembly::{Assembly, LeafPolicy};
use crate::ast::Tag;
use regex::Regex;

/// Index of a parser in its pool's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParserId(pub(crate) usize);

impl ParserId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a named rule. Each rule name maps to exactly one `RuleId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lower bound of a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repeat {
    ZeroOrMore,
    OneOrMore,
}

impl Repeat {
    pub fn min(self) -> usize {
        match self {
            Repeat::ZeroOrMore => 0,
            Repeat::OneOrMore => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Combinator<T: Tag> {
    /// All parts in order; fails as a whole if any part fails.
    Sequence { parts: Vec<ParserId>, assembly: Assembly<T> },
    /// First choice that succeeds, in declared order.
    Alternative { choices: Vec<ParserId>, assembly: Assembly<T> },
    Repeat { inner: ParserId, bound: Repeat, assembly: Assembly<T> },
    /// Always succeeds; a failed inner parser yields an elided empty node.
    Optional { inner: ParserId },
    /// Regex leaf. `pattern` is `None` when the source failed to compile; such
    /// a leaf never matches.
    Leaf { source: String, pattern: Option<Regex>, policy: LeafPolicy<T> },
    /// Named reference. `rule` is `None` when the name was never defined; such
    /// a reference never matches.
    Reference { name: String, rule: Option<RuleId> },
}

impl<T: Tag> Combinator<T> {
    /// Parsers this one schedules directly (references excluded).
    pub fn operands(&self) -> &[ParserId] {
        match self {
            Combinator::Sequence { parts, .. } => parts,
            Combinator::Alternative { choices, .. } => choices,
            Combinator::Repeat { inner, .. } | Combinator::Optional { inner } => std::slice::from_ref(inner),
            Combinator::Leaf { .. } | Combinator::Reference { .. } => &[],
        }
    }

    /// Compact grammar-ish rendering, e.g. `/\d+/ -> Capture(Number)` or `@diff`.
    pub fn describe(&self) -> String {
        match self {
            Combinator::Sequence { parts, assembly } => format!("seq[{}] {:?}", parts.len(), assembly),
            Combinator::Alternative { choices, assembly } => format!("alt[{}] {:?}", choices.len(), assembly),
            Combinator::Repeat { bound, assembly, .. } => format!("{bound:?} {assembly:?}"),
            Combinator::Optional { .. } => "optional".to_string(),
            Combinator::Leaf { source, pattern, policy } => match pattern {
                Some(_) => format!("/{source}/ -> {policy:?}"),
                None => format!("/{source}/ (invalid)"),
            },
            Combinator::Reference { name, rule } => match rule {
                Some(_) => format!("@{name}"),
                None => format!("@{name} (undefined)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        Num,
    }

    #[test]
    fn describe_marks_broken_parsers() {
        let mut g = GrammarBuilder::new();
        g.rule("top").capture(r"\d+", T::Num).call("missing").or().capture("(", T::Num).end();
        let pool = g.build();
        let described: Vec<String> = (0..pool.len()).map(|i| pool.node(ParserId(i)).describe()).collect();

        assert!(described.contains(&r"/\d+/ -> Capture(Num)".to_string()));
        assert!(described.contains(&"@missing (undefined)".to_string()));
        assert!(described.contains(&"/(/ (invalid)".to_string()));
        assert!(described.iter().any(|d| d.starts_with("alt[2]")));
    }
}

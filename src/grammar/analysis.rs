//! Static checks run once per build.
//!
//! The engine never needs these to parse correctly; they exist to describe a
//! grammar (for reports and the CLI) and to flag wiring that is legal but
//! probably wrong.
//!
//! ## Invariants
//!
//! - Every parser node belongs to exactly one rule's subgraph: the builder
//!   lowers each rule into fresh nodes, and rules only meet through
//!   `Combinator::Reference`.
//! - Nullability is a least fixpoint: start from "nothing is nullable" and
//!   grow until no node changes.

use super::pool::RuleEntry;
use crate::ast::Tag;
use crate::combinator::{Combinator, ParserId, Repeat, RuleId};
use crate::error::GrammarIssue;
use std::collections::HashSet;

bitflags::bitflags! {
    /// Per-rule facts computed at build time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// The rule can succeed without consuming input.
        const NULLABLE   = 1 << 0;
        /// The rule can reach itself through references.
        const RECURSIVE  = 1 << 1;
        /// The rule's own subgraph contains an undefined reference.
        const UNRESOLVED = 1 << 2;
    }
}

/// Parser-level nullability for every node in the arena.
pub(crate) fn nullable_parsers<T: Tag>(nodes: &[Combinator<T>], rules: &[RuleEntry]) -> Vec<bool> {
    let mut nullable = vec![false; nodes.len()];
    loop {
        let mut changed = false;
        for (idx, node) in nodes.iter().enumerate() {
            if nullable[idx] {
                continue;
            }
            let now = match node {
                Combinator::Leaf { pattern: Some(re), .. } => re.is_match(""),
                Combinator::Leaf { pattern: None, .. } => false,
                Combinator::Sequence { parts, .. } => parts.iter().all(|p| nullable[p.0]),
                Combinator::Alternative { choices, .. } => choices.iter().any(|p| nullable[p.0]),
                Combinator::Repeat { bound: Repeat::ZeroOrMore, .. } | Combinator::Optional { .. } => true,
                Combinator::Repeat { inner, bound: Repeat::OneOrMore, .. } => nullable[inner.0],
                Combinator::Reference { rule: Some(rule), .. } => nullable[rules[rule.0].root.0],
                Combinator::Reference { rule: None, .. } => false,
            };
            if now {
                nullable[idx] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// Nodes of one rule's own subgraph, not following references.
fn subgraph<T: Tag>(nodes: &[Combinator<T>], root: ParserId) -> Vec<ParserId> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    let mut out = Vec::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        out.push(id);
        stack.extend(nodes[id.0].operands().iter().rev());
    }
    out
}

/// Compute [`RuleFlags`] for every rule and collect warnings about
/// repetitions over nullable parsers.
pub(crate) fn analyze<T: Tag>(nodes: &[Combinator<T>], rules: &[RuleEntry]) -> (Vec<RuleFlags>, Vec<GrammarIssue>) {
    let nullable = nullable_parsers(nodes, rules);
    let mut flags = vec![RuleFlags::empty(); rules.len()];
    let mut issues = Vec::new();
    let mut calls: Vec<Vec<RuleId>> = vec![Vec::new(); rules.len()];

    for (idx, entry) in rules.iter().enumerate() {
        if nullable[entry.root.0] {
            flags[idx] |= RuleFlags::NULLABLE;
        }
        let mut nullable_repeat = false;
        for id in subgraph(nodes, entry.root) {
            match &nodes[id.0] {
                Combinator::Reference { rule: Some(target), .. } => calls[idx].push(*target),
                Combinator::Reference { rule: None, .. } => flags[idx] |= RuleFlags::UNRESOLVED,
                Combinator::Repeat { inner, .. } if nullable[inner.0] => nullable_repeat = true,
                _ => {}
            }
        }
        if nullable_repeat {
            issues.push(GrammarIssue::NullableRepetition { rule: entry.name.clone() });
        }
    }

    for (idx, flag) in flags.iter_mut().enumerate() {
        let mut seen = HashSet::new();
        let mut stack: Vec<RuleId> = calls[idx].clone();
        while let Some(rule) = stack.pop() {
            if rule.0 == idx {
                *flag |= RuleFlags::RECURSIVE;
                break;
            }
            if seen.insert(rule) {
                stack.extend(calls[rule.0].iter().copied());
            }
        }
    }

    (flags, issues)
}

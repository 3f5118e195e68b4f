//! Packrat memoization keyed by `(offset, rule)`.
//!
//! Alternatives that share a prefix (`diff "+" ... | diff`) re-enter the same
//! rule at the same offset. The memo table answers the second attempt without
//! re-running the rule.
//!
//! ## What counts as "the same attempt"
//!
//! The key is the byte offset where the rule reference was scheduled and the
//! [`RuleId`] of the referenced rule. A rule name maps to exactly one `RuleId`,
//! and a `RuleId` to exactly one parser subgraph, so this is equivalent to
//! keying by rule name without hashing strings.
//!
//! An entry is inserted as [`MemoEntry::InProgress`] when the rule starts. Hitting
//! that marker means the rule re-entered itself without consuming input (left
//! recursion), and the inner attempt fails instead of looping forever.

use crate::ast::{Node, Tag};
use crate::combinator::RuleId;
use crate::cursor::Mark;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    pub(crate) offset: usize,
    pub(crate) rule: RuleId,
}

#[derive(Debug, Clone)]
pub(crate) enum MemoEntry<T: Tag> {
    InProgress,
    Done { result: Option<Node<T>>, end: Mark },
}

#[derive(Debug)]
pub(crate) struct MemoTable<T: Tag> {
    entries: HashMap<MemoKey, MemoEntry<T>>,
}

impl<T: Tag> MemoTable<T> {
    pub(crate) fn new() -> Self {
        MemoTable { entries: HashMap::new() }
    }

    pub(crate) fn get(&self, key: MemoKey) -> Option<&MemoEntry<T>> {
        self.entries.get(&key)
    }

    pub(crate) fn begin(&mut self, key: MemoKey) {
        self.entries.insert(key, MemoEntry::InProgress);
    }

    /// Record a finished attempt. `end` is where the cursor stood afterwards;
    /// for failures that equals the start offset.
    pub(crate) fn finish(&mut self, key: MemoKey, result: Option<Node<T>>, end: Mark) {
        self.entries.insert(key, MemoEntry::Done { result, end });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

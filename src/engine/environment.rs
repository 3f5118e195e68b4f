//! The trampoline scheduler.
//!
//! Every composite parser is split into "start" (in [`Environment::run`]) and
//! "continue with the result of my sub-parser" (in [`Environment::resume`]).
//! Neither half calls the other directly; they only push onto three stacks:
//!
//! ```text
//! work     [.., ParserId]          run next
//! frames   [.., Frame]             resume when work is empty
//! results  [.., Option<Node>]      one entry per finished parser
//! ```
//!
//! The scheduler loop pops work while there is any, then pops one frame and
//! feeds it the top result. A frame either schedules one more sub-parser (and
//! pushes a follow-up frame) or pushes exactly one result. Native recursion
//! depth is therefore constant; grammar depth only grows the heap stacks.
//!
//! Sequence over `[a, b]`, where `a` and `b` are leaves:
//!
//! ```text
//! run(seq)        frames=[Seq#1]          work=[a]
//! run(a)          results=[Some(a)]
//! resume(Seq#1)   frames=[Seq#2]          work=[b]
//! run(b)          results=[Some(b)]
//! resume(Seq#2)   results=[Some(assembly([a, b]))]
//! ```

use super::memo::{MemoEntry, MemoKey, MemoTable};
use super::metrics::EngineMetrics;
use crate::assembly::Assembly;
use crate::ast::{Ast, Node, Tag};
use crate::combinator::{Combinator, ParserId, Repeat, RuleId};
use crate::cursor::{Cursor, Mark};
use crate::grammar::ParserPool;

/// A suspended composite parser waiting for its sub-parser's result.
enum Frame<'p, T: Tag> {
    Sequence {
        parts: &'p [ParserId],
        assembly: &'p Assembly<T>,
        /// Index of the part to schedule after the pending one.
        next: usize,
        start: Mark,
        children: Vec<Ast<T>>,
    },
    Alternative {
        choices: &'p [ParserId],
        assembly: &'p Assembly<T>,
        next: usize,
        start: Mark,
    },
    Repeat {
        inner: ParserId,
        bound: Repeat,
        assembly: &'p Assembly<T>,
        count: usize,
        start: Mark,
        /// Cursor position before the pending iteration.
        before: Mark,
        children: Vec<Ast<T>>,
    },
    Optional,
    Rule {
        rule: RuleId,
        start: Mark,
    },
}

/// Drives one parse of one input against a [`ParserPool`].
pub struct Environment<'p, 'i, T: Tag> {
    pool: &'p ParserPool<T>,
    cursor: Cursor<'i>,
    work: Vec<ParserId>,
    frames: Vec<Frame<'p, T>>,
    results: Vec<Option<Node<T>>>,
    memo: Option<MemoTable<T>>,
    metrics: EngineMetrics,
}

impl<'p, 'i, T: Tag> Environment<'p, 'i, T> {
    pub fn new(pool: &'p ParserPool<T>, cursor: Cursor<'i>, memoize: bool) -> Self {
        Environment {
            pool,
            cursor,
            work: Vec::new(),
            frames: Vec::new(),
            results: Vec::new(),
            memo: memoize.then(MemoTable::new),
            metrics: EngineMetrics::default(),
        }
    }

    pub fn cursor(&self) -> &Cursor<'i> {
        &self.cursor
    }

    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics { memo_entries: self.memo.as_ref().map_or(0, MemoTable::len), ..self.metrics }
    }

    /// Evaluate `root` at the current cursor position.
    ///
    /// Returns `None` when `root` does not match; the cursor is then back where
    /// it started. On success the cursor sits right after the match.
    pub fn evaluate(&mut self, root: ParserId) -> Option<Node<T>> {
        self.work.push(root);
        self.drain()
    }

    /// Evaluate `rule` the way a reference to it would: through the memo
    /// table and the left-recursion marker.
    pub fn evaluate_rule(&mut self, rule: RuleId) -> Option<Node<T>> {
        self.enter_rule(rule);
        self.drain()
    }

    fn drain(&mut self) -> Option<Node<T>> {
        loop {
            self.metrics.observe(self.work.len(), self.frames.len(), self.results.len());
            if let Some(id) = self.work.pop() {
                self.metrics.steps += 1;
                self.run(id);
                continue;
            }
            let Some(frame) = self.frames.pop() else {
                break;
            };
            self.metrics.resumes += 1;
            let outcome = self.results.pop().flatten();
            self.resume(frame, outcome);
        }
        debug_assert_eq!(self.results.len(), 1, "a finished evaluation leaves exactly one result");
        self.results.pop().flatten()
    }

    /// Start one parser: leaves finish immediately, composites push a frame
    /// and their first sub-parser.
    fn run(&mut self, id: ParserId) {
        let pool = self.pool;
        match pool.node(id) {
            Combinator::Leaf { pattern: Some(pattern), policy, .. } => {
                self.metrics.leaf_attempts += 1;
                let result = self.cursor.looking_at(pattern).map(|m| policy.apply(&m));
                if result.is_some() {
                    self.metrics.leaf_matches += 1;
                }
                self.results.push(result);
            }
            Combinator::Leaf { pattern: None, .. } => self.results.push(None),
            Combinator::Sequence { parts, assembly } => match parts.first() {
                None => self.results.push(Some(assembly.apply(Vec::new()))),
                Some(&first) => {
                    let start = self.cursor.mark();
                    let children = Vec::with_capacity(parts.len());
                    self.frames.push(Frame::Sequence { parts, assembly, next: 1, start, children });
                    self.work.push(first);
                }
            },
            Combinator::Alternative { choices, assembly } => match choices.first() {
                None => self.results.push(None),
                Some(&first) => {
                    let start = self.cursor.mark();
                    self.frames.push(Frame::Alternative { choices, assembly, next: 1, start });
                    self.work.push(first);
                }
            },
            Combinator::Repeat { inner, bound, assembly } => {
                let start = self.cursor.mark();
                self.frames.push(Frame::Repeat {
                    inner: *inner,
                    bound: *bound,
                    assembly,
                    count: 0,
                    start,
                    before: start,
                    children: Vec::new(),
                });
                self.work.push(*inner);
            }
            Combinator::Optional { inner } => {
                self.frames.push(Frame::Optional);
                self.work.push(*inner);
            }
            Combinator::Reference { rule: Some(rule), .. } => self.enter_rule(*rule),
            Combinator::Reference { rule: None, name } => {
                log::trace!("reference to undefined rule `{name}` fails");
                self.results.push(None);
            }
        }
    }

    fn enter_rule(&mut self, rule: RuleId) {
        let start = self.cursor.mark();
        if let Some(memo) = &mut self.memo {
            let key = MemoKey { offset: start.offset(), rule };
            match memo.get(key) {
                Some(MemoEntry::Done { result, end }) => {
                    self.metrics.memo_hits += 1;
                    let result = result.clone();
                    self.cursor.reset(*end);
                    self.results.push(result);
                    return;
                }
                Some(MemoEntry::InProgress) => {
                    self.metrics.recursion_cuts += 1;
                    log::trace!("rule `{}` re-entered at {} (left recursion), failing", self.pool.rule_name(rule), key.offset);
                    self.results.push(None);
                    return;
                }
                None => {
                    self.metrics.memo_misses += 1;
                    memo.begin(key);
                }
            }
        }
        log::trace!("enter `{}` at {}", self.pool.rule_name(rule), start.offset());
        self.frames.push(Frame::Rule { rule, start });
        self.work.push(self.pool.rule_root(rule));
    }

    /// Continue a suspended parser with the result of its pending sub-parser.
    fn resume(&mut self, frame: Frame<'p, T>, outcome: Option<Node<T>>) {
        match frame {
            Frame::Sequence { parts, assembly, next, start, mut children } => {
                let Some(node) = outcome else {
                    self.cursor.reset(start);
                    self.results.push(None);
                    return;
                };
                node.collect_into(&mut children);
                match parts.get(next) {
                    Some(&part) => {
                        self.frames.push(Frame::Sequence { parts, assembly, next: next + 1, start, children });
                        self.work.push(part);
                    }
                    None => self.results.push(Some(assembly.apply(children))),
                }
            }
            Frame::Alternative { choices, assembly, next, start } => {
                if let Some(node) = outcome {
                    self.results.push(Some(assembly.apply_one(node)));
                    return;
                }
                self.cursor.reset(start);
                match choices.get(next) {
                    Some(&choice) => {
                        self.frames.push(Frame::Alternative { choices, assembly, next: next + 1, start });
                        self.work.push(choice);
                    }
                    None => self.results.push(None),
                }
            }
            Frame::Repeat { inner, bound, assembly, mut count, start, before, mut children } => {
                if let Some(node) = outcome {
                    node.collect_into(&mut children);
                    count += 1;
                    if self.cursor.offset() > before.offset() {
                        let before = self.cursor.mark();
                        self.frames.push(Frame::Repeat { inner, bound, assembly, count, start, before, children });
                        self.work.push(inner);
                        return;
                    }
                    // An iteration that consumed nothing would repeat forever.
                    self.metrics.zero_width_stops += 1;
                    log::warn!("repetition stopped at {}: iteration matched without consuming input", before.offset());
                }
                if count < bound.min() {
                    self.cursor.reset(start);
                    self.results.push(None);
                } else {
                    self.results.push(Some(assembly.apply(children)));
                }
            }
            Frame::Optional => self.results.push(Some(outcome.unwrap_or_else(Node::nothing))),
            Frame::Rule { rule, start } => {
                if outcome.is_none() {
                    debug_assert_eq!(self.cursor.offset(), start.offset(), "failed rule consumed input");
                }
                if let Some(memo) = &mut self.memo {
                    memo.finish(MemoKey { offset: start.offset(), rule }, outcome.clone(), self.cursor.mark());
                }
                log::trace!(
                    "exit `{}` at {}: {}",
                    self.pool.rule_name(rule),
                    start.offset(),
                    if outcome.is_some() { "matched" } else { "no match" }
                );
                self.results.push(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        Open,
        Nest,
    }

    fn nested() -> ParserPool<T> {
        let mut g = GrammarBuilder::new();
        g.rule("nest").keyword(r"\(", T::Open).maybe("nest").hide(r"\)").tag(T::Nest).end();
        g.build()
    }

    fn root(pool: &ParserPool<T>) -> ParserId {
        pool.rule_root(pool.rule_id("nest").unwrap())
    }

    #[test]
    fn stacks_grow_with_depth_instead_of_native_calls() {
        let pool = nested();
        let shallow = "()";
        let deep = format!("{}{}", "(".repeat(500), ")".repeat(500));

        let mut env = Environment::new(&pool, Cursor::new(shallow), true);
        assert!(env.evaluate(root(&pool)).is_some());
        let small = env.metrics().max_frames;

        let mut env = Environment::new(&pool, Cursor::new(&deep), true);
        let tree = env.evaluate(root(&pool)).unwrap().into_ast();
        assert_eq!(env.cursor().offset(), 1000);
        assert_eq!(tree.depth(), 501);
        assert!(env.metrics().max_frames > 100 * small);
    }

    #[test]
    fn entering_a_rule_records_it_in_the_memo() {
        let pool = nested();
        let rule = pool.rule_id("nest").unwrap();

        let mut env = Environment::new(&pool, Cursor::new("(())"), true);
        let entered = env.evaluate_rule(rule).unwrap().into_ast();
        assert_eq!(entered.depth(), 3);
        assert_eq!(env.metrics().memo_entries, 3);

        let mut env = Environment::new(&pool, Cursor::new("(())"), true);
        let body = env.evaluate(root(&pool)).unwrap().into_ast();
        assert_eq!(body, entered);
        assert_eq!(env.metrics().memo_entries, 2);
    }

    #[test]
    fn failure_restores_the_cursor() {
        let pool = nested();
        let mut env = Environment::new(&pool, Cursor::new("((()"), false);
        assert!(env.evaluate(root(&pool)).is_none());
        assert_eq!(env.cursor().offset(), 0);
        assert_eq!(env.cursor().furthest(), 4);
        assert_eq!(env.metrics().memo_entries, 0);
    }
}

//! The built grammar registry.
//!
//! A [`ParserPool`] is immutable once [`GrammarBuilder::build`] returns it. It
//! owns the parser arena, the rule table and the grammar's default ignorable
//! patterns. Parsing never mutates it, so one pool can serve any number of
//! concurrent parses as long as each parse has its own cursor and environment.
//!
//! [`GrammarBuilder::build`]: super::GrammarBuilder::build

use super::analysis::RuleFlags;
use crate::api::{Options, Outcome, ParseFlags};
use crate::ast::{Ast, Tag};
use crate::combinator::{Combinator, ParserId, RuleId};
use crate::cursor::Cursor;
use crate::engine::{Environment, RunMetrics};
use crate::error::{GrammarIssue, ParseError};
use regex::Regex;
use std::collections::HashMap;
use std::time::Instant;

/// One named rule and the root of its parser subgraph.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub name: String,
    pub root: ParserId,
    pub flags: RuleFlags,
}

#[derive(Debug)]
pub struct ParserPool<T: Tag> {
    pub(crate) nodes: Vec<Combinator<T>>,
    pub(crate) rules: Vec<RuleEntry>,
    pub(crate) by_name: HashMap<String, RuleId>,
    pub(crate) ignorables: Vec<Regex>,
    pub(crate) issues: Vec<GrammarIssue>,
}

impl<T: Tag> ParserPool<T> {
    /// Parser for rule `name`, if the rule exists.
    pub fn parser(&self, name: &str) -> Option<Parser<'_, T>> {
        self.rule_id(name).map(|rule| Parser { pool: self, rule })
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.by_name.get(name).copied()
    }

    pub fn rule(&self, id: RuleId) -> &RuleEntry {
        &self.rules[id.0]
    }

    pub fn rule_name(&self, id: RuleId) -> &str {
        &self.rules[id.0].name
    }

    pub fn rule_root(&self, id: RuleId) -> ParserId {
        self.rules[id.0].root
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[RuleEntry] {
        &self.rules
    }

    pub fn node(&self, id: ParserId) -> &Combinator<T> {
        &self.nodes[id.0]
    }

    /// Number of parsers in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ignorable patterns used when [`Options`] does not override them.
    pub fn ignorables(&self) -> &[Regex] {
        &self.ignorables
    }

    /// Everything the build noticed, fatal or not.
    pub fn issues(&self) -> &[GrammarIssue] {
        &self.issues
    }

    /// Fail on the first fatal issue (undefined reference, invalid pattern).
    pub fn validate(&self) -> Result<(), GrammarIssue> {
        match self.issues.iter().find(|issue| issue.is_fatal()) {
            Some(issue) => Err(issue.clone()),
            None => Ok(()),
        }
    }
}

/// A rule of a pool, ready to run against input.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'p, T: Tag> {
    pool: &'p ParserPool<T>,
    rule: RuleId,
}

impl<'p, T: Tag> Parser<'p, T> {
    pub fn name(&self) -> &'p str {
        self.pool.rule_name(self.rule)
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Parse `input` with default options and require it to be fully consumed.
    pub fn parse(&self, input: &str) -> Result<Ast<T>, ParseError> {
        self.run(input, &Options::default()).into_result()
    }

    /// Run the rule against `input` and report what happened.
    ///
    /// ```text
    /// run() -> Environment::evaluate_rule(rule)
    ///            │
    ///            ├─ None          -> NoMatch at the furthest position reached
    ///            └─ Some(tree)    -> trailing check (ignorables skipped)
    /// ```
    pub fn run(&self, input: &str, options: &Options) -> Outcome<T> {
        let started = Instant::now();
        let ignorables = options.ignorables.as_deref().unwrap_or(self.pool.ignorables.as_slice());
        let cursor = Cursor::with_ignorables(input, ignorables);
        let mut env = Environment::new(self.pool, cursor, options.flags.contains(ParseFlags::MEMOIZE));

        let tree = env.evaluate_rule(self.rule).map(|node| node.into_ast());
        let cursor = env.cursor();
        let consumed = cursor.offset();
        let trailing = tree.is_some() && !cursor.is_empty();

        let result = match tree {
            None => Err(ParseError::NoMatch {
                rule: self.name().to_string(),
                furthest: cursor.position(cursor.furthest()),
                snippet: cursor.snippet(cursor.furthest()),
            }),
            Some(_) if trailing && !options.flags.contains(ParseFlags::ALLOW_TRAILING) => {
                let at = cursor.significant_offset();
                Err(ParseError::TrailingInput { at: cursor.position(at), snippet: cursor.snippet(at) })
            }
            Some(tree) => Ok(tree),
        };

        let metrics = RunMetrics { total: started.elapsed(), engine: env.metrics() };
        log::debug!(
            "rule `{}`: {} after {} steps, consumed {}/{} bytes",
            self.name(),
            if result.is_ok() { "ok" } else { "failed" },
            metrics.engine.steps,
            consumed,
            input.len()
        );

        Outcome { result, consumed, trailing, metrics }
    }
}

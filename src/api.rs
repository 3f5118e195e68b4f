//! Parse entry points and per-parse options.
//!
//! [`parse`] and [`parse_with`] return just the tree or the error.
//! [`parse_verbose_with`] also reports consumption, timing, engine counters and
//! the grammar's build issues, which is what the CLI prints.

use crate::ast::{Ast, Tag};
use crate::engine::{EngineMetrics, RunMetrics};
use crate::error::{GrammarIssue, ParseError};
use crate::grammar::ParserPool;
use regex::Regex;
use std::time::Duration;

bitflags::bitflags! {
    /// Switches that change how a parse runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParseFlags: u8 {
        /// Cache rule results by `(offset, rule)` and cut left recursion.
        const MEMOIZE        = 1 << 0;
        /// Accept a match that leaves non-ignorable input behind.
        const ALLOW_TRAILING = 1 << 1;
    }
}

impl Default for ParseFlags {
    fn default() -> Self {
        ParseFlags::MEMOIZE
    }
}

/// Options that affect a single parse.
///
/// The defaults memoize and use the grammar's own ignorable patterns.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Replaces the grammar's ignorable patterns when set. Patterns should be
    /// anchored (see [`anchored_regex`](crate::anchored_regex)).
    pub ignorables: Option<Vec<Regex>>,
    pub flags: ParseFlags,
}

impl Options {
    /// Default options with `patterns` as the ignorables.
    pub fn with_ignorables(patterns: &[&str]) -> Result<Self, regex::Error> {
        let ignorables = patterns.iter().map(|p| crate::anchored_regex(p)).collect::<Result<Vec<_>, _>>()?;
        Ok(Options { ignorables: Some(ignorables), ..Options::default() })
    }

    /// Default options that skip whitespace regardless of the grammar.
    pub fn skip_whitespace() -> Self {
        Options { ignorables: Some(vec![regex!(r"\s+").clone()]), ..Options::default() }
    }

    pub fn without_memo(mut self) -> Self {
        self.flags.remove(ParseFlags::MEMOIZE);
        self
    }

    pub fn allow_trailing(mut self) -> Self {
        self.flags.insert(ParseFlags::ALLOW_TRAILING);
        self
    }
}

/// Everything a run of one rule produced.
#[derive(Debug, Clone)]
pub struct Outcome<T: Tag> {
    /// Root tree, or why there is none: the rule did not match, or it left
    /// input behind without [`ParseFlags::ALLOW_TRAILING`].
    pub result: Result<Ast<T>, ParseError>,
    /// Byte offset where the match ended (0 on no match).
    pub consumed: usize,
    /// Non-ignorable input remains after the match.
    pub trailing: bool,
    pub metrics: RunMetrics,
}

impl<T: Tag> Outcome<T> {
    pub fn is_complete(&self) -> bool {
        self.result.is_ok() && !self.trailing
    }

    pub fn into_result(self) -> Result<Ast<T>, ParseError> {
        self.result
    }
}

/// Compact debugging summary returned by [`parse_verbose_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseDetails {
    pub rule: String,
    pub input_len: usize,
    pub consumed: usize,
    pub trailing: bool,
    /// Total elapsed time.
    pub total: Duration,
    pub engine: EngineMetrics,
    /// Issues found when the grammar was built.
    pub issues: Vec<GrammarIssue>,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose<T: Tag> {
    pub result: Result<Ast<T>, ParseError>,
    pub details: ParseDetails,
}

/// Parse `input` with rule `rule` of `pool` and default [`Options`].
///
/// # Example
/// ```
/// use trellis::{GrammarBuilder, parse};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Tag { Num, Add }
///
/// let mut g = GrammarBuilder::new();
/// g.ignore(r"\s+");
/// g.rule("sum").call("num").hide(r"\+").call("num").tag(Tag::Add).end();
/// g.rule("num").capture(r"\d+", Tag::Num).end();
/// let pool = g.build();
///
/// let tree = parse(&pool, "sum", "1 + 2").unwrap();
/// assert_eq!(tree.to_string(), r#"Add(Num("1"), Num("2"))"#);
/// ```
pub fn parse<T: Tag>(pool: &ParserPool<T>, rule: &str, input: &str) -> Result<Ast<T>, ParseError> {
    parse_with(pool, rule, input, &Options::default())
}

/// Parse `input` with explicit `options`.
pub fn parse_with<T: Tag>(
    pool: &ParserPool<T>,
    rule: &str,
    input: &str,
    options: &Options,
) -> Result<Ast<T>, ParseError> {
    let parser = pool.parser(rule).ok_or_else(|| ParseError::UnknownRule(rule.to_string()))?;
    parser.run(input, options).into_result()
}

/// Parse `input` and return extra (compact) debug details alongside the
/// result. [`parse_with`] skips building these.
pub fn parse_verbose_with<T: Tag>(
    pool: &ParserPool<T>,
    rule: &str,
    input: &str,
    options: &Options,
) -> ParseResultVerbose<T> {
    let mut details = ParseDetails {
        rule: rule.to_string(),
        input_len: input.len(),
        issues: pool.issues().to_vec(),
        ..ParseDetails::default()
    };
    let Some(parser) = pool.parser(rule) else {
        return ParseResultVerbose { result: Err(ParseError::UnknownRule(rule.to_string())), details };
    };

    let outcome = parser.run(input, options);
    details.consumed = outcome.consumed;
    details.trailing = outcome.trailing;
    details.total = outcome.metrics.total;
    details.engine = outcome.metrics.engine;

    ParseResultVerbose { result: outcome.into_result(), details }
}

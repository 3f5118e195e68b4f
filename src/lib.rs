//! A trampolined parser-combinator engine.
//!
//! Grammars are declared as named rules with [`GrammarBuilder`], built into an
//! immutable [`ParserPool`], and run against text to produce an [`Ast`]. The
//! engine keeps its own work, continuation and result stacks, so grammar and
//! input depth never grow the native call stack.

#[macro_use]
mod macros;
mod api;
pub mod assembly;
pub mod ast;
pub mod combinator;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod grammars;

pub use api::{Options, Outcome, ParseDetails, ParseFlags, ParseResultVerbose, parse, parse_verbose_with, parse_with};
pub use assembly::{Assembly, LeafPolicy};
pub use ast::{Ast, Capture, Node, Tag};
pub use combinator::{Combinator, ParserId, Repeat, RuleId};
pub use cursor::{Cursor, Mark, Match, anchored_regex};
pub use engine::{EngineMetrics, RunMetrics};
pub use error::{GrammarIssue, ParseError, Position};
pub use grammar::{GrammarBuilder, Parser, ParserPool, RuleBuilder, RuleFlags};

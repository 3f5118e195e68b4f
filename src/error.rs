//! Grammar-level errors.
//!
//! Local match failures never show up here: inside the engine they are plain
//! `None` results. Only two things surface to callers:
//!
//! - [`ParseError`]: the entry rule did not match, or it matched but left
//!   non-ignorable input behind.
//! - [`GrammarIssue`]: wiring problems found while building a grammar. They
//!   never abort the build; the affected parser simply never matches.

pub use crate::cursor::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    #[error("rule `{rule}` did not match; furthest progress at {furthest} near \"{snippet}\"")]
    NoMatch { rule: String, furthest: Position, snippet: String },

    #[error("unconsumed input at {at}: \"{snippet}\"")]
    TrailingInput { at: Position, snippet: String },

    #[error("invalid grammar: {0}")]
    Grammar(#[from] GrammarIssue),
}

impl ParseError {
    /// Position to point a diagnostic at, when there is one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::NoMatch { furthest, .. } => Some(*furthest),
            ParseError::TrailingInput { at, .. } => Some(*at),
            ParseError::UnknownRule(_) | ParseError::Grammar(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarIssue {
    #[error("rule `{rule}` references undefined rule `{target}`")]
    UndefinedRule { rule: String, target: String },

    #[error("rule `{rule}` has an invalid pattern /{pattern}/: {message}")]
    InvalidPattern { rule: String, pattern: String, message: String },

    #[error("rule `{rule}` is defined more than once; the first definition wins")]
    DuplicateRule { rule: String },

    #[error("rule `{rule}` repeats a parser that can match without consuming input")]
    NullableRepetition { rule: String },
}

impl GrammarIssue {
    /// Fatal issues make some parser unable to ever match. The others are
    /// warnings about well-defined but probably unintended behavior.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GrammarIssue::UndefinedRule { .. } | GrammarIssue::InvalidPattern { .. })
    }

    /// Rule the issue was found in.
    pub fn rule(&self) -> &str {
        match self {
            GrammarIssue::UndefinedRule { rule, .. }
            | GrammarIssue::InvalidPattern { rule, .. }
            | GrammarIssue::DuplicateRule { rule }
            | GrammarIssue::NullableRepetition { rule } => rule,
        }
    }
}

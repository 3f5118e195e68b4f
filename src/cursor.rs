//! Input cursor with backtracking marks and ignorable-pattern skipping.
//!
//! A [`Cursor`] is a read-only view over the input plus a byte offset. Leaf
//! parsers call [`Cursor::looking_at`] to attempt an anchored match at the
//! current offset; everything else in the engine only ever takes [`Mark`]s and
//! resets to them.
//!
//! ```text
//! input:  "// note\n  42 + 1"
//!          ^ offset 0
//! looking_at(\d+) with ignorables [//[^\n]*, \s+]
//!   try \d+        -> miss
//!   skip comment   -> offset 7
//!   try \d+        -> miss
//!   skip \s+       -> offset 10
//!   try \d+        -> hit "42" at 10..12, offset becomes 12
//! ```
//!
//! ## Invariants
//!
//! - A failed `looking_at` leaves the offset exactly where it was.
//! - The offset only moves backwards through [`Cursor::reset`] to a mark taken
//!   earlier during the same parse.
//! - Ignorable matches must be non-empty to count as progress.

use regex::Regex;
use std::ops::Range;

/// Opaque snapshot of a cursor offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

impl Mark {
    /// Byte offset this mark points at.
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Result of a successful anchored match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Full matched text.
    pub text: String,
    /// Absolute byte span in the original input.
    pub span: Range<usize>,
    /// Capture groups `1..`, `None` where a group did not participate.
    pub groups: Vec<Option<String>>,
}

impl Match {
    /// Text a capturing leaf keeps: the first participating group if the
    /// pattern declares groups, otherwise the whole match.
    pub fn captured(&self) -> &str {
        self.groups.iter().flatten().next().map(String::as_str).unwrap_or(&self.text)
    }
}

/// 1-based line/column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Consumable view over an input string.
#[derive(Debug, Clone)]
pub struct Cursor<'i> {
    input: &'i str,
    offset: usize,
    ignorables: &'i [Regex],
    furthest: usize,
}

impl<'i> Cursor<'i> {
    /// Cursor at the start of `input` with no ignorable patterns.
    pub fn new(input: &'i str) -> Self {
        Self::with_ignorables(input, &[])
    }

    /// Cursor at the start of `input` that transparently skips `ignorables`
    /// before every leaf match.
    pub fn with_ignorables(input: &'i str, ignorables: &'i [Regex]) -> Self {
        Cursor { input, offset: 0, ignorables, furthest: 0 }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Furthest offset any successful leaf match has reached.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn mark(&self) -> Mark {
        Mark(self.offset)
    }

    /// Rewind (or fast-forward, for memo hits) to `mark`.
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.input.len());
        self.offset = mark.0;
    }

    /// Unconsumed tail of the input, ignorables included.
    pub fn remaining(&self) -> &'i str {
        &self.input[self.offset..]
    }

    /// True when only ignorable content (or nothing) is left.
    pub fn is_empty(&self) -> bool {
        self.skip_ignorables(self.offset) == self.input.len()
    }

    /// Offset of the first non-ignorable byte at or after the current offset.
    pub fn significant_offset(&self) -> usize {
        self.skip_ignorables(self.offset)
    }

    /// Attempt an anchored match of `pattern` at the current offset.
    ///
    /// Ignorable patterns are tried between attempts, one at a time, so that a
    /// comment followed by whitespace followed by the token is skipped in one
    /// call. On a miss the offset is left untouched.
    pub fn looking_at(&mut self, pattern: &Regex) -> Option<Match> {
        let mut at = self.offset;
        loop {
            if let Some(found) = self.anchored(pattern, at) {
                self.offset = found.span.end;
                self.furthest = self.furthest.max(self.offset);
                return Some(found);
            }
            match self.skip_one(at) {
                Some(next) => at = next,
                None => return None,
            }
        }
    }

    /// Line/column of `offset` in this cursor's input.
    pub fn position(&self, offset: usize) -> Position {
        position_of(self.input, offset)
    }

    /// Short preview of the input starting at `offset`, for diagnostics.
    pub fn snippet(&self, offset: usize) -> String {
        snippet_at(self.input, offset)
    }

    fn anchored(&self, pattern: &Regex, at: usize) -> Option<Match> {
        // Patterns compiled through `anchored_regex` fail fast here; raw
        // patterns still work but a miss scans the rest of the tail.
        let tail = &self.input[at..];
        let caps = pattern.captures(tail)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        let groups = (1..caps.len()).map(|i| caps.get(i).map(|g| g.as_str().to_string())).collect();
        Some(Match { text: whole.as_str().to_string(), span: at..at + whole.end(), groups })
    }

    fn skip_one(&self, at: usize) -> Option<usize> {
        let tail = &self.input[at..];
        self.ignorables.iter().find_map(|re| match re.find(tail) {
            Some(m) if m.start() == 0 && m.end() > 0 => Some(at + m.end()),
            _ => None,
        })
    }

    fn skip_ignorables(&self, mut at: usize) -> usize {
        while let Some(next) = self.skip_one(at) {
            at = next;
        }
        at
    }
}

/// Compile `pattern` so it can only match at the start of the haystack.
pub fn anchored_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{pattern})"))
}

/// Line/column of `offset` in `input` (columns count chars, not bytes).
pub fn position_of(input: &str, offset: usize) -> Position {
    let offset = offset.min(input.len());
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    Position { offset, line, column }
}

/// At most 24 chars of `input` from `offset`, with newlines escaped.
pub fn snippet_at(input: &str, offset: usize) -> String {
    let tail = input.get(offset.min(input.len())..).unwrap_or("");
    let mut out: String = tail.chars().take(24).collect::<String>().replace('\n', "\\n");
    if tail.chars().count() > 24 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(p: &str) -> Regex {
        anchored_regex(p).unwrap()
    }

    #[test]
    fn match_advances_offset() {
        let mut c = Cursor::new("42 + 1");
        let m = c.looking_at(&re(r"\d+")).unwrap();
        assert_eq!(m.text, "42");
        assert_eq!(m.span, 0..2);
        assert_eq!(c.offset(), 2);
    }

    #[test]
    fn miss_leaves_cursor_untouched() {
        let ws = vec![re(r"\s+")];
        let mut c = Cursor::with_ignorables("   abc", &ws);
        assert!(c.looking_at(&re(r"\d+")).is_none());
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn match_is_anchored_at_offset() {
        let mut c = Cursor::new("abc 42");
        assert!(c.looking_at(&re(r"\d+")).is_none());
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn skips_interleaved_ignorables() {
        let ignorables = vec![re(r"//[^\n]*"), re(r"\s+")];
        let mut c = Cursor::with_ignorables("// note\n  // again\n 42", &ignorables);
        let m = c.looking_at(&re(r"\d+")).unwrap();
        assert_eq!(m.text, "42");
        assert_eq!(m.span.start, 20);
        assert!(c.is_empty());
    }

    #[test]
    fn marks_restore_offset() {
        let mut c = Cursor::new("abcdef");
        let start = c.mark();
        c.looking_at(&re("abc")).unwrap();
        assert_eq!(c.remaining(), "def");
        c.reset(start);
        assert_eq!(c.offset(), 0);
        assert_eq!(c.furthest(), 3);
    }

    #[test]
    fn captured_prefers_first_group() {
        let mut c = Cursor::new("a_12 rest");
        let m = c.looking_at(&re(r"a_(\d+)")).unwrap();
        assert_eq!(m.captured(), "12");
        let mut c = Cursor::new("fac");
        let m = c.looking_at(&re(r"[a-z]+")).unwrap();
        assert_eq!(m.captured(), "fac");
    }

    #[test]
    fn is_empty_ignores_trailing_ignorables() {
        let ws = vec![re(r"\s+")];
        let mut c = Cursor::with_ignorables("x  \n", &ws);
        assert!(!c.is_empty());
        c.looking_at(&re("x")).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.remaining(), "  \n");
    }

    #[test]
    fn unanchored_patterns_still_match_only_at_offset() {
        let mut c = Cursor::new("ab 42");
        assert!(c.looking_at(&Regex::new(r"\d+").unwrap()).is_none());
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn positions_are_one_based() {
        let p = position_of("ab\ncd", 4);
        assert_eq!((p.line, p.column), (2, 2));
        assert_eq!(snippet_at("ab\ncd", 1), "b\\ncd");
    }
}

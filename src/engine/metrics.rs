//! Engine run metrics.
//!
//! A small set of counters used to observe and debug engine behavior:
//!
//! - `Parser::run` always fills [`RunMetrics`]; the counters are plain integer
//!   bumps in the scheduler loop.
//! - The CLI prints them after the tree (see `debug_report.rs`).
//!
//! ## Design notes
//!
//! - Stack high-water marks are the observable proof of the trampoline: they
//!   grow with grammar/input depth while native recursion stays flat.
//! - `steps` counts parsers run; `resumes` counts continuations resumed.

use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Parsers popped from the work stack and run.
    pub steps: usize,
    /// Continuations popped from the frame stack and resumed.
    pub resumes: usize,
    /// Regex leaf attempts.
    pub leaf_attempts: usize,
    /// Regex leaf attempts that matched.
    pub leaf_matches: usize,
    /// Rule references answered from the memo table.
    pub memo_hits: usize,
    /// Rule references evaluated and then stored in the memo table.
    pub memo_misses: usize,
    /// Entries in the memo table when the run finished.
    pub memo_entries: usize,
    /// References cut because the same rule was already in progress at the
    /// same offset (left recursion).
    pub recursion_cuts: usize,
    /// Repetitions stopped because an iteration consumed nothing.
    pub zero_width_stops: usize,
    /// Largest work stack seen.
    pub max_work: usize,
    /// Largest frame (continuation) stack seen.
    pub max_frames: usize,
    /// Largest result stack seen.
    pub max_results: usize,
}

impl EngineMetrics {
    pub(crate) fn observe(&mut self, work: usize, frames: usize, results: usize) {
        self.max_work = self.max_work.max(work);
        self.max_frames = self.max_frames.max(frames);
        self.max_results = self.max_results.max(results);
    }
}

/// Engine counters bundled with wall-clock timing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunMetrics {
    /// Total elapsed time for the run, including the trailing-input check.
    pub total: Duration,
    pub engine: EngineMetrics,
}

//! Trampolined execution engine.
//!
//! This module evaluates a parser graph against one input without using the
//! native call stack for grammar recursion. Grammars routinely recurse once
//! per input line or per operator, so recursive evaluation would overflow on
//! large inputs.
//!
//! ## How the parts work together
//!
//! ```text
//! ParserPool (arena) ──┐
//!                      │  Environment::evaluate        (environment.rs)
//! Cursor (input) ──────┼─ work stack:   parsers to run next
//!                      │  frame stack:  what to do with their result
//!                      │  result stack: Some(Node) | None
//!                      │
//!                      ├─ MemoTable                    (memo.rs)
//!                      │    (offset, rule) -> result + end mark
//!                      v
//!              Option<Node<T>> + EngineMetrics          (metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `environment.rs`: the scheduler loop and one continuation per composite
//!   parser variant.
//! - `memo.rs`: packrat cache keyed by byte offset and rule, plus the
//!   in-progress marker that cuts left recursion.
//! - `metrics.rs`: counters and stack high-water marks for a run.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=trellis=trace` to log every rule entry and exit.

#[path = "engine/environment.rs"]
mod environment;
#[path = "engine/memo.rs"]
mod memo;
#[path = "engine/metrics.rs"]
mod metrics;

pub use environment::Environment;
pub use metrics::{EngineMetrics, RunMetrics};

//! Grammar definition and the built parser registry.
//!
//! ```text
//! GrammarBuilder ── rule(..)...end() ──┐
//!                  ignore(..)          │  build()
//!                  unite(..)           v
//!                              phase 1: intern rule names -> RuleId
//!                              phase 2: lower clauses into the arena,
//!                                       resolve references by name
//!                              analysis: RuleFlags + warnings
//!                                      │
//!                                      v
//!                                 ParserPool ── parser(name) ── Parser::run
//! ```
//!
//! The split into files mirrors those stages:
//!
//! - `builder.rs`: the DSL and both build phases.
//! - `analysis.rs`: nullability, recursion and unresolved-reference flags.
//! - `pool.rs`: the immutable registry and the per-rule [`Parser`] handle.

#[path = "grammar/analysis.rs"]
mod analysis;
#[path = "grammar/builder.rs"]
mod builder;
#[path = "grammar/pool.rs"]
mod pool;

pub use analysis::RuleFlags;
pub use builder::{GrammarBuilder, IGNORABLE_RULE, RuleBuilder};
pub use pool::{Parser, ParserPool, RuleEntry};

//! Declarative grammar construction.
//!
//! Rules are written as chains of steps, one clause per alternative:
//!
//! ```text
//! g.rule("sum")                         sum ::= diff sum_tail+   => Add
//!     .call("diff").some("sum_tail")        |   diff
//!     .tag(Tag::Add)
//!     .or()
//!     .call("diff")
//!     .end();
//! ```
//!
//! Nothing is resolved while rules are declared. [`GrammarBuilder::build`]
//! interns every rule name first and only then lowers steps into the parser
//! arena, so references may point forwards, backwards or at the rule itself.

use super::analysis::{self, RuleFlags};
use super::pool::{ParserPool, RuleEntry};
use crate::assembly::{Assembly, LeafPolicy};
use crate::ast::Tag;
use crate::combinator::{Combinator, ParserId, Repeat, RuleId};
use crate::cursor::anchored_regex;
use crate::error::GrammarIssue;
use regex::Regex;
use std::collections::HashMap;

/// Rule name used in issues about grammar-level ignorable patterns.
pub const IGNORABLE_RULE: &str = "(ignorable)";

#[derive(Debug, Clone)]
enum Step<T: Tag> {
    Leaf { source: String, policy: LeafPolicy<T> },
    Call(String),
    Repeat { name: String, bound: Repeat, assembly: Assembly<T> },
    Maybe(String),
    AnyOf(Vec<String>),
}

#[derive(Debug, Clone)]
struct Clause<T: Tag> {
    steps: Vec<Step<T>>,
    /// `None` until `tag`/`assemble` is called on the clause.
    assembly: Option<Assembly<T>>,
}

impl<T: Tag> Clause<T> {
    fn new() -> Self {
        Clause { steps: Vec::new(), assembly: None }
    }

    /// A lone step passes its result through; anything longer groups its
    /// children under an untyped node for the parent to splice.
    fn assembly(&self) -> Assembly<T> {
        match (&self.assembly, self.steps.len()) {
            (Some(assembly), _) => assembly.clone(),
            (None, 1) => Assembly::First,
            (None, _) => Assembly::Splice(None),
        }
    }
}

#[derive(Debug, Clone)]
struct RuleDef<T: Tag> {
    name: String,
    clauses: Vec<Clause<T>>,
}

/// Collects rule definitions and ignorable patterns, then builds a
/// [`ParserPool`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder<T: Tag> {
    rules: Vec<RuleDef<T>>,
    ignorables: Vec<String>,
}

impl<T: Tag> Default for GrammarBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tag> GrammarBuilder<T> {
    pub fn new() -> Self {
        GrammarBuilder { rules: Vec::new(), ignorables: Vec::new() }
    }

    /// Skip text matching `pattern` before every leaf match.
    pub fn ignore(&mut self, pattern: &str) -> &mut Self {
        if !self.ignorables.iter().any(|p| p == pattern) {
            self.ignorables.push(pattern.to_string());
        }
        self
    }

    /// Open a new rule. The rule is registered when [`RuleBuilder::end`] runs;
    /// a builder dropped before that leaves the grammar untouched.
    #[must_use = "a rule is only registered by calling `end()`"]
    pub fn rule(&mut self, name: &str) -> RuleBuilder<'_, T> {
        RuleBuilder { grammar: self, name: name.to_string(), clauses: Vec::new(), current: Clause::new() }
    }

    /// Append every rule and ignorable of `other`. On a name collision the
    /// definition already present here wins.
    pub fn unite(&mut self, other: GrammarBuilder<T>) -> &mut Self {
        for pattern in &other.ignorables {
            self.ignore(pattern);
        }
        self.rules.extend(other.rules);
        self
    }

    /// Resolve references, compile patterns and run the analysis pass.
    ///
    /// Never fails: every problem becomes a [`GrammarIssue`] on the pool and
    /// the affected parser simply never matches. Use
    /// [`ParserPool::validate`] to turn fatal issues into an error.
    pub fn build(&self) -> ParserPool<T> {
        let mut issues = Vec::new();

        // Phase 1: one RuleId per distinct name, first definition wins.
        let mut by_name: HashMap<String, RuleId> = HashMap::new();
        let mut defs: Vec<&RuleDef<T>> = Vec::new();
        for def in &self.rules {
            if by_name.contains_key(&def.name) {
                log::warn!("rule `{}` defined more than once; keeping the first definition", def.name);
                issues.push(GrammarIssue::DuplicateRule { rule: def.name.clone() });
                continue;
            }
            by_name.insert(def.name.clone(), RuleId(defs.len()));
            defs.push(def);
        }

        // Phase 2: lower every clause into the arena.
        let mut lower = Lowering { nodes: Vec::new(), by_name: &by_name, issues: &mut issues };
        let mut rules = Vec::with_capacity(defs.len());
        for def in &defs {
            let root = lower.rule(def);
            rules.push(RuleEntry { name: def.name.clone(), root, flags: RuleFlags::empty() });
        }
        let nodes = lower.nodes;

        let mut ignorables = Vec::with_capacity(self.ignorables.len());
        for pattern in &self.ignorables {
            match anchored_regex(pattern) {
                Ok(re) => ignorables.push(re),
                Err(err) => issues.push(GrammarIssue::InvalidPattern {
                    rule: IGNORABLE_RULE.to_string(),
                    pattern: pattern.clone(),
                    message: err.to_string(),
                }),
            }
        }

        let (flags, warnings) = analysis::analyze(&nodes, &rules);
        for (entry, flags) in rules.iter_mut().zip(flags) {
            entry.flags = flags;
        }
        issues.extend(warnings);

        for issue in &issues {
            log::debug!("grammar issue: {issue}");
        }
        log::debug!(
            "built grammar: {} rules, {} parsers, {} ignorables, {} issues",
            rules.len(),
            nodes.len(),
            ignorables.len(),
            issues.len()
        );

        ParserPool { nodes, rules, by_name, ignorables, issues }
    }
}

/// Second build phase: turns rule definitions into arena nodes.
struct Lowering<'b, T: Tag> {
    nodes: Vec<Combinator<T>>,
    by_name: &'b HashMap<String, RuleId>,
    issues: &'b mut Vec<GrammarIssue>,
}

impl<T: Tag> Lowering<'_, T> {
    fn push(&mut self, node: Combinator<T>) -> ParserId {
        self.nodes.push(node);
        ParserId(self.nodes.len() - 1)
    }

    fn rule(&mut self, def: &RuleDef<T>) -> ParserId {
        let mut choices = Vec::with_capacity(def.clauses.len());
        for clause in &def.clauses {
            let parts = clause.steps.iter().map(|step| self.step(&def.name, step)).collect();
            choices.push(self.push(Combinator::Sequence { parts, assembly: clause.assembly() }));
        }
        if let [single] = choices[..] {
            return single;
        }
        self.push(Combinator::Alternative { choices, assembly: Assembly::First })
    }

    fn step(&mut self, rule: &str, step: &Step<T>) -> ParserId {
        match step {
            Step::Leaf { source, policy } => {
                let pattern = self.compile(rule, source);
                self.push(Combinator::Leaf { source: source.clone(), pattern, policy: policy.clone() })
            }
            Step::Call(name) => self.reference(rule, name),
            Step::Repeat { name, bound, assembly } => {
                let inner = self.reference(rule, name);
                self.push(Combinator::Repeat { inner, bound: *bound, assembly: assembly.clone() })
            }
            Step::Maybe(name) => {
                let inner = self.reference(rule, name);
                self.push(Combinator::Optional { inner })
            }
            Step::AnyOf(names) => {
                let choices = names.iter().map(|name| self.reference(rule, name)).collect();
                self.push(Combinator::Alternative { choices, assembly: Assembly::First })
            }
        }
    }

    fn reference(&mut self, rule: &str, name: &str) -> ParserId {
        let target = self.by_name.get(name).copied();
        if target.is_none() {
            self.issues.push(GrammarIssue::UndefinedRule { rule: rule.to_string(), target: name.to_string() });
        }
        self.push(Combinator::Reference { name: name.to_string(), rule: target })
    }

    fn compile(&mut self, rule: &str, source: &str) -> Option<Regex> {
        match anchored_regex(source) {
            Ok(re) => Some(re),
            Err(err) => {
                self.issues.push(GrammarIssue::InvalidPattern {
                    rule: rule.to_string(),
                    pattern: source.to_string(),
                    message: err.to_string(),
                });
                None
            }
        }
    }
}

/// An open rule. Steps append to the current clause; [`or`](Self::or) starts
/// the next one; [`end`](Self::end) registers the rule and gives the grammar
/// back. Ending consumes the builder, so a registered rule cannot change.
#[must_use = "a rule is only registered by calling `end()`"]
pub struct RuleBuilder<'g, T: Tag> {
    grammar: &'g mut GrammarBuilder<T>,
    name: String,
    clauses: Vec<Clause<T>>,
    current: Clause<T>,
}

impl<'g, T: Tag> RuleBuilder<'g, T> {
    fn step(mut self, step: Step<T>) -> Self {
        self.current.steps.push(step);
        self
    }

    /// Match `pattern` and drop the result.
    pub fn hide(self, pattern: &str) -> Self {
        self.leaf(pattern, LeafPolicy::Hide)
    }

    /// Match `pattern` and keep a tag-only node.
    pub fn keyword(self, pattern: &str, tag: T) -> Self {
        self.leaf(pattern, LeafPolicy::Keyword(tag))
    }

    /// Match `pattern` and keep the tag with the captured text.
    pub fn capture(self, pattern: &str, tag: T) -> Self {
        self.leaf(pattern, LeafPolicy::Capture(tag))
    }

    pub fn leaf(self, pattern: &str, policy: LeafPolicy<T>) -> Self {
        self.step(Step::Leaf { source: pattern.to_string(), policy })
    }

    /// Reference another rule (or this one) by name.
    pub fn call(self, name: &str) -> Self {
        self.step(Step::Call(name.to_string()))
    }

    /// Zero or more `name`.
    pub fn many(self, name: &str) -> Self {
        self.repeat(name, Repeat::ZeroOrMore, Assembly::Splice(None))
    }

    /// One or more `name`.
    pub fn some(self, name: &str) -> Self {
        self.repeat(name, Repeat::OneOrMore, Assembly::Splice(None))
    }

    pub fn repeat(self, name: &str, bound: Repeat, assembly: Assembly<T>) -> Self {
        self.step(Step::Repeat { name: name.to_string(), bound, assembly })
    }

    pub fn maybe(self, name: &str) -> Self {
        self.step(Step::Maybe(name.to_string()))
    }

    /// First of `names` that matches.
    pub fn any_of(self, names: &[&str]) -> Self {
        self.step(Step::AnyOf(names.iter().map(|n| n.to_string()).collect()))
    }

    /// Wrap the clause's children under `tag`, splicing untyped children.
    pub fn tag(self, tag: T) -> Self {
        self.assemble(Assembly::Splice(Some(tag)))
    }

    /// Wrap the clause's children under `tag` as they are.
    pub fn tag_all(self, tag: T) -> Self {
        self.assemble(Assembly::All(Some(tag)))
    }

    pub fn assemble(mut self, assembly: Assembly<T>) -> Self {
        self.current.assembly = Some(assembly);
        self
    }

    /// Close the current clause and start another alternative.
    pub fn or(mut self) -> Self {
        let done = std::mem::replace(&mut self.current, Clause::new());
        self.clauses.push(done);
        self
    }

    pub fn end(self) -> &'g mut GrammarBuilder<T> {
        let RuleBuilder { grammar, name, mut clauses, current } = self;
        clauses.push(current);
        log::trace!("declared rule `{name}` with {} clause(s)", clauses.len());
        grammar.rules.push(RuleDef { name, clauses });
        grammar
    }
}

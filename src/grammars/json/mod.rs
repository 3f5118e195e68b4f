//! JSON documents.
//!
//! Strings keep their raw (still escaped) contents; numbers keep their source
//! text. Whitespace between tokens is ignorable.

use crate::grammar::{GrammarBuilder, ParserPool};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Json {
    Object,
    Property,
    Array,
    String,
    Number,
    True,
    False,
    Null,
}

/// Entry rule.
pub const ENTRY: &str = "value";

pub static GRAMMAR: Lazy<ParserPool<Json>> = Lazy::new(|| builder().build());

pub fn builder() -> GrammarBuilder<Json> {
    let mut g = GrammarBuilder::new();
    g.ignore(r"\s+");

    g.rule("value").any_of(&["object", "array", "string", "number", "literal"]).end();

    g.rule("object").hide(r"\{").maybe("members").hide(r"\}").tag(Json::Object).end();
    g.rule("members").call("property").many("more_members").end();
    g.rule("more_members").hide(",").call("property").end();
    g.rule("property").call("string").hide(":").call("value").tag(Json::Property).end();

    g.rule("array").hide(r"\[").maybe("elements").hide(r"\]").tag(Json::Array).end();
    g.rule("elements").call("value").many("more_elements").end();
    g.rule("more_elements").hide(",").call("value").end();

    g.rule("string").capture(r#""((?:[^"\\]|\\.)*)""#, Json::String).end();
    g.rule("number").capture(r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?", Json::Number).end();
    g.rule("literal")
        .keyword(r"true\b", Json::True)
        .or()
        .keyword(r"false\b", Json::False)
        .or()
        .keyword(r"null\b", Json::Null)
        .end();
    g
}

#[cfg(test)]
mod tests;

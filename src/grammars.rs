//! Grammars bundled with the crate.
//!
//! Each one is a plain [`GrammarBuilder`](crate::GrammarBuilder) program with
//! its own tag enum, built once into a `Lazy` static:
//!
//! - [`arithmetic`]: `+ - * /` with precedence and parentheses.
//! - [`json`]: objects, arrays, strings, numbers and literals.
//! - [`assembly`]: a line-oriented register/accumulator notation with labels.

pub mod arithmetic;
pub mod assembly;
pub mod json;

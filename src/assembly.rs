//! Tree-shaping policies.
//!
//! Composite parsers hand their surviving child trees to an [`Assembly`];
//! leaves hand their [`Match`] to a [`LeafPolicy`]. The canonical policies are
//! what decide which grouping nodes survive into the final tree:
//!
//! ```text
//! children:            [_(a, b), Y]          (_ = untyped)
//! First                _(a, b)
//! Splice(Some(T))      T(a, b, Y)
//! All(Some(T))         T(_(a, b), Y)
//! ```

use crate::ast::{Ast, Node, Tag};
use crate::cursor::Match;
use std::fmt;
use std::sync::Arc;

pub type AssembleFn<T> = Arc<dyn Fn(Vec<Ast<T>>) -> Node<T> + Send + Sync>;
pub type LeafFn<T> = Arc<dyn Fn(&Match) -> Node<T> + Send + Sync>;

/// How a composite parser turns its surviving children into one result.
#[derive(Clone)]
pub enum Assembly<T: Tag> {
    /// The first surviving child, or an elided empty node if none survived.
    First,
    /// Wrap children under the tag, splicing in the children of untyped ones.
    Splice(Option<T>),
    /// Wrap children under the tag as they are.
    All(Option<T>),
    Custom(AssembleFn<T>),
}

impl<T: Tag> Assembly<T> {
    pub fn splice(tag: impl Into<Option<T>>) -> Self {
        Assembly::Splice(tag.into())
    }

    pub fn all(tag: impl Into<Option<T>>) -> Self {
        Assembly::All(tag.into())
    }

    pub fn custom(f: impl Fn(Vec<Ast<T>>) -> Node<T> + Send + Sync + 'static) -> Self {
        Assembly::Custom(Arc::new(f))
    }

    /// Assemble an ordered list of surviving children.
    pub fn apply(&self, children: Vec<Ast<T>>) -> Node<T> {
        match self {
            Assembly::First => children.into_iter().next().map(Node::Kept).unwrap_or_else(Node::nothing),
            Assembly::Splice(tag) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    child.splice_into(&mut flat);
                }
                Node::Kept(Ast::branch(*tag, flat))
            }
            Assembly::All(tag) => Node::Kept(Ast::branch(*tag, children)),
            Assembly::Custom(f) => f(children),
        }
    }

    /// Assemble the single result of an alternative. Elided results pass
    /// through untouched.
    pub fn apply_one(&self, node: Node<T>) -> Node<T> {
        match (self, node) {
            (Assembly::First, node) => node,
            (_, Node::Kept(ast)) => self.apply(vec![ast]),
            (_, elided) => elided,
        }
    }
}

impl<T: Tag> fmt::Debug for Assembly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assembly::First => f.write_str("First"),
            Assembly::Splice(tag) => write!(f, "Splice({tag:?})"),
            Assembly::All(tag) => write!(f, "All({tag:?})"),
            Assembly::Custom(_) => f.write_str("Custom(<function>)"),
        }
    }
}

/// How a leaf turns a regex match into a result.
#[derive(Clone)]
pub enum LeafPolicy<T: Tag> {
    /// Consume the text, elide the result.
    Hide,
    /// Keep only the tag.
    Keyword(T),
    /// Keep the tag and the captured text (see [`Match::captured`]).
    Capture(T),
    Custom(LeafFn<T>),
}

impl<T: Tag> LeafPolicy<T> {
    pub fn custom(f: impl Fn(&Match) -> Node<T> + Send + Sync + 'static) -> Self {
        LeafPolicy::Custom(Arc::new(f))
    }

    pub fn apply(&self, m: &Match) -> Node<T> {
        match self {
            LeafPolicy::Hide => Node::Elided(Ast::leaf(None, &m.text, m.span.clone())),
            LeafPolicy::Keyword(tag) => Node::Kept(Ast::keyword(*tag)),
            LeafPolicy::Capture(tag) => Node::Kept(Ast::leaf(Some(*tag), m.captured(), m.span.clone())),
            LeafPolicy::Custom(f) => f(m),
        }
    }
}

impl<T: Tag> fmt::Debug for LeafPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafPolicy::Hide => f.write_str("Hide"),
            LeafPolicy::Keyword(tag) => write!(f, "Keyword({tag:?})"),
            LeafPolicy::Capture(tag) => write!(f, "Capture({tag:?})"),
            LeafPolicy::Custom(_) => f.write_str("Custom(<function>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        X,
        Y,
        A,
        B,
        Top,
    }

    fn leaf(tag: T) -> Ast<T> {
        Ast::leaf(Some(tag), "v", 0..1)
    }

    fn grouped() -> Vec<Ast<T>> {
        vec![Ast::branch(None, vec![leaf(T::A), leaf(T::B)]), leaf(T::Y)]
    }

    #[test]
    fn splice_flattens_untyped_children() {
        let out = Assembly::splice(T::Top).apply(grouped()).into_ast();
        let tags: Vec<_> = out.children().iter().map(|c| c.tag()).collect();
        assert_eq!(out.tag(), Some(T::Top));
        assert_eq!(tags, [Some(T::A), Some(T::B), Some(T::Y)]);
    }

    #[test]
    fn splice_keeps_typed_branches() {
        let kids = vec![Ast::branch(Some(T::X), vec![leaf(T::A)]), leaf(T::Y)];
        let out = Assembly::splice(T::Top).apply(kids).into_ast();
        assert_eq!(out.to_string(), r#"Top(X(A("v")), Y("v"))"#);
    }

    #[test]
    fn all_wraps_unconditionally() {
        let out = Assembly::all(T::Top).apply(grouped()).into_ast();
        assert_eq!(out.children().len(), 2);
        assert!(out.children()[0].is_untyped());
    }

    #[test]
    fn first_takes_first_or_elides() {
        assert_eq!(Assembly::First.apply(grouped()).ast().children().len(), 2);
        assert!(Assembly::<T>::First.apply(Vec::new()).is_elided());
    }

    #[test]
    fn leaf_policies() {
        let m = Match { text: "a_1".into(), span: 0..3, groups: vec![Some("1".into())] };
        assert!(LeafPolicy::<T>::Hide.apply(&m).is_elided());
        assert_eq!(LeafPolicy::Keyword(T::X).apply(&m).ast().text(), None);
        assert_eq!(LeafPolicy::Capture(T::A).apply(&m).ast().text(), Some("1"));
    }

    #[test]
    fn apply_one_passes_elided_through() {
        assert!(Assembly::splice(T::Top).apply_one(Node::nothing()).is_elided());
        let wrapped = Assembly::splice(T::Top).apply_one(Node::Kept(leaf(T::A))).into_ast();
        assert_eq!(wrapped.to_string(), r#"Top(A("v"))"#);
    }
}

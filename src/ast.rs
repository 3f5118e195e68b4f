//! Abstract syntax tree produced by parsers.
//!
//! An [`Ast`] is immutable once built. Three shapes exist:
//!
//! ```text
//! leaf     Number("42")        tag + captured text, no children
//! keyword  Nil                 tag only
//! branch   Add(.., ..)         optional tag + ordered children
//! ```
//!
//! A node never carries both captured text and children; the constructors are
//! the only way to build one, so that shape cannot be expressed.
//!
//! Children sit behind an `Arc`, which makes `clone` O(1). Memoized results are
//! re-delivered by cloning, and trees may be as deep as the input is long, so
//! `Drop` and [`Ast::walk`] are iterative rather than recursive.
//!
//! Elision is carried by [`Node`], not by the tree itself.

use std::fmt;
use std::hash::Hash;
use std::ops::Range;
use std::sync::Arc;

/// Node tag type. Each grammar defines one closed enum implementing this.
pub trait Tag: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> Tag for T where T: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Text captured by a leaf match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: Arc<str>,
    pub span: Range<usize>,
}

#[derive(Clone)]
pub struct Ast<T> {
    tag: Option<T>,
    capture: Option<Capture>,
    children: Option<Arc<Vec<Ast<T>>>>,
}

impl<T: Tag> Ast<T> {
    /// Untyped node with no children, used for elided placeholders.
    pub fn empty() -> Self {
        Ast { tag: None, capture: None, children: None }
    }

    /// Tag-only leaf (keyword policy).
    pub fn keyword(tag: T) -> Self {
        Ast { tag: Some(tag), capture: None, children: None }
    }

    /// Leaf carrying captured text.
    pub fn leaf(tag: Option<T>, text: &str, span: Range<usize>) -> Self {
        Ast { tag, capture: Some(Capture { text: Arc::from(text), span }), children: None }
    }

    /// Branch node; `tag: None` makes an untyped grouping node.
    pub fn branch(tag: Option<T>, children: Vec<Ast<T>>) -> Self {
        let children = if children.is_empty() { None } else { Some(Arc::new(children)) };
        Ast { tag, capture: None, children }
    }

    pub fn tag(&self) -> Option<T> {
        self.tag
    }

    /// True for nodes without a tag.
    pub fn is_untyped(&self) -> bool {
        self.tag.is_none()
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    /// Captured text of a leaf.
    pub fn text(&self) -> Option<&str> {
        self.capture.as_ref().map(|c| &*c.text)
    }

    pub fn children(&self) -> &[Ast<T>] {
        self.children.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child(&self, idx: usize) -> Option<&Ast<T>> {
        self.children().get(idx)
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Pre-order traversal without native recursion.
    pub fn walk(&self) -> Walk<'_, T> {
        Walk { stack: vec![self] }
    }

    /// Length of the longest root-to-leaf path (a lone node has depth 1).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, d)) = stack.pop() {
            deepest = deepest.max(d);
            stack.extend(node.children().iter().map(|c| (c, d + 1)));
        }
        deepest
    }

    /// Children of an untyped branch, or the node itself otherwise.
    ///
    /// This is the splice step of the `children-if-tag-absent` policy.
    pub(crate) fn splice_into(self, out: &mut Vec<Ast<T>>) {
        if self.tag.is_none() && self.capture.is_none() {
            out.extend(self.children().iter().cloned());
        } else {
            out.push(self);
        }
    }
}

impl<T> Drop for Ast<T> {
    fn drop(&mut self) {
        let Some(children) = self.children.take() else {
            return;
        };
        let mut pending = vec![children];
        while let Some(shared) = pending.pop() {
            // Shared child lists stay alive for their other owners.
            if let Some(mut owned) = Arc::into_inner(shared) {
                for child in owned.iter_mut() {
                    if let Some(grand) = child.children.take() {
                        pending.push(grand);
                    }
                }
            }
        }
    }
}

/// Structural equality: tags, captured text and children. Spans are ignored.
impl<T: PartialEq> PartialEq for Ast<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.tag != b.tag || a.capture.as_ref().map(|c| &c.text) != b.capture.as_ref().map(|c| &c.text) {
                return false;
            }
            let (ka, kb) = (a.children.as_deref(), b.children.as_deref());
            let (ka, kb) = (ka.map(Vec::as_slice).unwrap_or(&[]), kb.map(Vec::as_slice).unwrap_or(&[]));
            if ka.len() != kb.len() {
                return false;
            }
            stack.extend(ka.iter().zip(kb.iter()));
        }
        true
    }
}

impl<T: Eq> Eq for Ast<T> {}

/// Renders `Tag("text")`, `Tag`, `Tag(child, ..)`, with `_` for untyped nodes.
impl<T: Tag> fmt::Display for Ast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'a, T> {
            Node(&'a Ast<T>),
            Punct(&'static str),
        }

        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Punct(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node.tag {
                Some(tag) => write!(f, "{tag:?}")?,
                None => f.write_str("_")?,
            }
            if let Some(text) = node.text() {
                write!(f, "({text:?})")?;
                continue;
            }
            let children = node.children();
            if children.is_empty() {
                continue;
            }
            f.write_str("(")?;
            stack.push(Piece::Punct(")"));
            for (idx, child) in children.iter().enumerate().rev() {
                stack.push(Piece::Node(child));
                if idx > 0 {
                    stack.push(Piece::Punct(", "));
                }
            }
        }
        Ok(())
    }
}

impl<T: Tag> fmt::Debug for Ast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ast({self})")
    }
}

/// Pre-order iterator returned by [`Ast::walk`].
pub struct Walk<'a, T> {
    stack: Vec<&'a Ast<T>>,
}

impl<'a, T: Tag> Iterator for Walk<'a, T> {
    type Item = &'a Ast<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// A parser result: kept in the enclosing tree, or elided from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<T: Tag> {
    Kept(Ast<T>),
    Elided(Ast<T>),
}

impl<T: Tag> Node<T> {
    /// Elided empty placeholder (failed optional, all-hidden sequence).
    pub fn nothing() -> Self {
        Node::Elided(Ast::empty())
    }

    pub fn is_elided(&self) -> bool {
        matches!(self, Node::Elided(_))
    }

    pub fn ast(&self) -> &Ast<T> {
        match self {
            Node::Kept(ast) | Node::Elided(ast) => ast,
        }
    }

    pub fn into_ast(self) -> Ast<T> {
        match self {
            Node::Kept(ast) | Node::Elided(ast) => ast,
        }
    }

    /// Append this result to a child list being assembled.
    ///
    /// Kept nodes are pushed as-is. Elided nodes vanish, except an elided
    /// untyped branch, which contributes its own children.
    pub fn collect_into(self, out: &mut Vec<Ast<T>>) {
        match self {
            Node::Kept(ast) => out.push(ast),
            Node::Elided(ast) if ast.is_untyped() && ast.capture().is_none() => {
                out.extend(ast.children().iter().cloned());
            }
            Node::Elided(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        Num,
        Add,
        Nil,
    }

    fn num(s: &str) -> Ast<T> {
        Ast::leaf(Some(T::Num), s, 0..s.len())
    }

    #[test]
    fn display_renders_nested_shape() {
        let tree = Ast::branch(Some(T::Add), vec![num("1"), Ast::keyword(T::Nil), Ast::branch(None, vec![num("2")])]);
        assert_eq!(tree.to_string(), r#"Add(Num("1"), Nil, _(Num("2")))"#);
    }

    #[test]
    fn leaves_never_have_children() {
        let leaf = num("7");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.text(), Some("7"));
        let branch = Ast::branch(Some(T::Add), vec![num("1")]);
        assert!(branch.text().is_none());
    }

    #[test]
    fn elided_nodes_vanish_when_collected() {
        let mut out = Vec::new();
        Node::Kept(num("1")).collect_into(&mut out);
        Node::Elided(num("2")).collect_into(&mut out);
        Node::<T>::nothing().collect_into(&mut out);
        Node::Elided(Ast::branch(None, vec![num("3"), num("4")])).collect_into(&mut out);
        let texts: Vec<_> = out.iter().filter_map(|a| a.text()).collect();
        assert_eq!(texts, ["1", "3", "4"]);
    }

    #[test]
    fn walk_is_preorder() {
        let tree = Ast::branch(Some(T::Add), vec![num("1"), Ast::branch(Some(T::Add), vec![num("2"), num("3")])]);
        let texts: Vec<_> = tree.walk().filter_map(|a| a.text()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn deep_trees_drop_and_compare_without_recursion() {
        let build = || {
            let mut tree = num("0");
            for _ in 0..200_000 {
                tree = Ast::branch(Some(T::Add), vec![num("1"), tree]);
            }
            tree
        };
        let (a, b) = (build(), build());
        assert_eq!(a, b);
        assert_eq!(a.depth(), 200_001);
        let shared = a.clone();
        drop(a);
        assert_eq!(shared.depth(), 200_001);
    }

    #[test]
    fn deep_trees_render_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let mut tree = num("0");
                for _ in 0..10_000 {
                    tree = Ast::branch(Some(T::Add), vec![num("1"), tree]);
                }
                (tree.to_string(), format!("{tree:?}"))
            })
            .unwrap();
        let (shown, debug) = handle.join().unwrap();
        assert!(shown.starts_with(r#"Add(Num("1"), Add(Num("1"), "#));
        assert!(shown.ends_with(&format!(r#"Num("0"){}"#, ")".repeat(10_000))));
        assert_eq!(shown.matches("Add(").count(), 10_000);
        assert_eq!(debug, format!("Ast({shown})"));
    }
}

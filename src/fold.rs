//! Fold transformer
//!
//! A post-order walk that reduces a tree into a result. Children are folded
//! before their parent, and the reducer sees the folded children together with
//! the original node, its path from the root and its parent.
//!
//! The reducer decides per node with a [`Reduction`]:
//!
//! - `Replace(value)` makes `value` the folded result of the node;
//! - `Keep` rebuilds the node from its folded children, passing the
//!   structure through unchanged;
//! - `Remove` drops the node, so it is missing from its parent's children.
//!
//! Reducers that only act at certain places (say, under the keys `left` and
//! `right`) match on the path and return `Keep` everywhere else.
//!
//! The folded result has the same type as the tree. [`Tree`] ships with an
//! impl for `serde_json::Value` only, so a reducer producing, say, source
//! text returns it as `Value::String`. Implement [`Tree`] for your own AST to
//! fold it directly.

use std::fmt;
use std::slice;

use serde_json::Value;

use crate::errors::Error;
use crate::parser::Parser;
use crate::token::TokenKind;

// ============================================================================
// PATHS
// ============================================================================

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

// ============================================================================
// TREES
// ============================================================================

/// A tree the fold can walk.
pub trait Tree: Sized {
    /// Direct children in the node's own iteration order. Leaves have none.
    fn children(&self) -> Vec<(PathSegment, &Self)>;

    /// The node rebuilt around already folded children.
    fn rebuild(&self, children: Vec<(PathSegment, Self)>) -> Self;
}

impl Tree for Value {
    fn children(&self) -> Vec<(PathSegment, &Self)> {
        match self {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (PathSegment::Index(index), item))
                .collect(),
            Value::Object(entries) => entries
                .iter()
                .map(|(key, value)| (PathSegment::Key(key.clone()), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn rebuild(&self, children: Vec<(PathSegment, Self)>) -> Self {
        match self {
            Value::Array(_) => Value::Array(children.into_iter().map(|(_, value)| value).collect()),
            Value::Object(_) => Value::Object(
                children
                    .into_iter()
                    .filter_map(|(segment, value)| match segment {
                        PathSegment::Key(key) => Some((key, value)),
                        PathSegment::Index(_) => None,
                    })
                    .collect(),
            ),
            leaf => leaf.clone(),
        }
    }
}

// ============================================================================
// FOLDING
// ============================================================================

/// What the reducer made of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction<N> {
    Replace(N),
    Keep,
    Remove,
}

/// The folded children of a node, minus the removed ones, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Folded<N> {
    entries: Vec<(PathSegment, N)>,
}

impl<N> Folded<N> {
    /// The folded child under `key`.
    pub fn get(&self, key: &str) -> Option<&N> {
        self.entries
            .iter()
            .find(|(segment, _)| segment.as_key() == Some(key))
            .map(|(_, value)| value)
    }

    /// The folded child that sat at `index` in the original node.
    pub fn at(&self, index: usize) -> Option<&N> {
        self.entries
            .iter()
            .find(|(segment, _)| segment.as_index() == Some(index))
            .map(|(_, value)| value)
    }

    pub fn values(&self) -> impl Iterator<Item = &N> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> slice::Iter<'_, (PathSegment, N)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, N> IntoIterator for &'a Folded<N> {
    type Item = &'a (PathSegment, N);
    type IntoIter = slice::Iter<'a, (PathSegment, N)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Folds `node` bottom-up. Returns `None` when the reducer removed the root.
///
/// The reducer is called as `reducer(children, node, path, parent)`; at the
/// root `path` is empty and `parent` is `None`.
pub fn fold<N, F>(mut reducer: F, node: &N) -> Option<N>
where
    N: Tree,
    F: FnMut(&Folded<N>, &N, &[PathSegment], Option<&N>) -> Reduction<N>,
{
    let mut path = Vec::new();
    fold_node(&mut reducer, node, &mut path, None)
}

fn fold_node<N, F>(reducer: &mut F, node: &N, path: &mut Vec<PathSegment>, parent: Option<&N>) -> Option<N>
where
    N: Tree,
    F: FnMut(&Folded<N>, &N, &[PathSegment], Option<&N>) -> Reduction<N>,
{
    let mut entries = Vec::new();
    for (segment, child) in node.children() {
        path.push(segment.clone());
        let folded = fold_node(reducer, child, path, Some(node));
        path.pop();
        if let Some(value) = folded {
            entries.push((segment, value));
        }
    }

    let children = Folded { entries };
    match reducer(&children, node, path, parent) {
        Reduction::Replace(value) => Some(value),
        Reduction::Keep => Some(node.rebuild(children.entries)),
        Reduction::Remove => None,
    }
}

// ============================================================================
// TRANSFORMER
// ============================================================================

type ParseFn<N, E> = dyn Fn(&str) -> Result<N, E> + Send + Sync;
type ReduceFn<N> = dyn Fn(&Folded<N>, &N, &[PathSegment], Option<&N>) -> Reduction<N> + Send + Sync;

/// A parse function composed with a fold: an interpreter or transpiler.
pub struct Transformer<N, E> {
    parse: Box<ParseFn<N, E>>,
    reducer: Box<ReduceFn<N>>,
}

impl<N: Tree, E> Transformer<N, E> {
    pub fn new<P, F>(parse: P, reducer: F) -> Self
    where
        P: Fn(&str) -> Result<N, E> + Send + Sync + 'static,
        F: Fn(&Folded<N>, &N, &[PathSegment], Option<&N>) -> Reduction<N> + Send + Sync + 'static,
    {
        Self {
            parse: Box::new(parse),
            reducer: Box::new(reducer),
        }
    }

    /// Parses `source` and folds the result.
    pub fn transform(&self, source: &str) -> Result<Option<N>, E> {
        let tree = (self.parse)(source)?;
        Ok(fold(&*self.reducer, &tree))
    }
}

impl<N, E> fmt::Debug for Transformer<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

impl<K: TokenKind, N: Tree + 'static> Parser<K, N> {
    /// Composes this parser with `reducer`.
    pub fn into_transformer<F>(self, reducer: F) -> Transformer<N, Error>
    where
        F: Fn(&Folded<N>, &N, &[PathSegment], Option<&N>) -> Reduction<N> + Send + Sync + 'static,
    {
        Transformer::new(move |source: &str| self.parse(source), reducer)
    }
}
